use clap::{Args, Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;
use vsb_client::config::DEFAULT_API_BASE_URL;
use vsb_client::{ApiError, ApiRequest, ClientConfig, Credentials, Registration, SessionManager};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing credentials; pass --email/--password or set VSB_EMAIL/VSB_PASSWORD")]
    MissingCredentials,
    #[error("login rejected")]
    LoginRejected,
    #[error("unsupported HTTP method: {0}")]
    InvalidMethod(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "vsb", about = "Session-aware client for the auth API")]
struct Cli {
    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    #[command(flatten)]
    login: LoginArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Default)]
struct LoginArgs {
    #[arg(long, env = "VSB_EMAIL", global = true)]
    email: Option<String>,

    #[arg(long, env = "VSB_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,
}

impl LoginArgs {
    fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::new(email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// API liveness and version.
    Status,
    /// Database connectivity as reported by the API.
    DbStatus,
    /// Create an account from --email/--password.
    Register,
    /// Sign in and print the current user.
    Login,
    /// Send an arbitrary request, signing in first when credentials are given.
    Request {
        path: String,
        #[arg(long, default_value = "GET")]
        method: String,
        #[arg(long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ClientConfig { base_url: ClientConfig::new(&cli.base_url)?.base_url, ..ClientConfig::from_env()? };
    let session = SessionManager::from_config(&config)?;

    match cli.command {
        Command::Status => print_get(&session, "/status").await,
        Command::DbStatus => print_get(&session, "/database/status").await,
        Command::Register => run_register(&session, &cli.login).await,
        Command::Login => run_login(&session, &cli.login).await,
        Command::Request { path, method, data } => run_request(&session, &cli.login, &path, &method, data).await,
    }
}

async fn print_get(session: &SessionManager, path: &str) -> Result<(), CliError> {
    let response = session.client().get(path).await?;
    print_body(&response.body)
}

async fn run_register(session: &SessionManager, login: &LoginArgs) -> Result<(), CliError> {
    let Some(credentials) = login.credentials() else {
        return Err(CliError::MissingCredentials);
    };
    let registration = Registration::new(credentials.email.as_str(), credentials.password.as_str());
    let registered = session.register(&registration).await?;
    println!("{} ({})", registered.message, registered.email);
    Ok(())
}

async fn run_login(session: &SessionManager, login: &LoginArgs) -> Result<(), CliError> {
    sign_in(session, login).await?;
    if let Some(user) = session.current_user() {
        println!("{} {} [{}]", user.id, user.email, user.roles.join(", "));
    }
    session.logout().await?;
    Ok(())
}

async fn run_request(
    session: &SessionManager,
    login: &LoginArgs,
    path: &str,
    method: &str,
    data: Option<String>,
) -> Result<(), CliError> {
    let signed_in = login.credentials().is_some();
    if signed_in {
        sign_in(session, login).await?;
    }

    let mut request = ApiRequest::new(parse_method(method)?, path);
    if let Some(raw) = data {
        request = request.json(serde_json::from_str::<Value>(&raw)?);
    }
    let result = session.client().send(request).await;

    if signed_in {
        if let Err(e) = session.logout().await {
            tracing::warn!(error = %e, "logout after request failed");
        }
    }
    print_body(&result?.body)
}

async fn sign_in(session: &SessionManager, login: &LoginArgs) -> Result<(), CliError> {
    let credentials = login.credentials().ok_or(CliError::MissingCredentials)?;
    if session.login(&credentials).await? {
        Ok(())
    } else {
        Err(CliError::LoginRejected)
    }
}

fn parse_method(raw: &str) -> Result<Method, CliError> {
    match raw.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        _ => Err(CliError::InvalidMethod(raw.to_owned())),
    }
}

/// Pretty-print JSON bodies; pass anything else through.
fn render_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_owned()),
        Err(_) => body.to_owned(),
    }
}

fn print_body(body: &str) -> Result<(), CliError> {
    if !body.is_empty() {
        println!("{}", render_body(body));
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
