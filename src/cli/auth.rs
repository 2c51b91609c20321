use crate::{config::Credentials, error, info, spotify, success};

pub async fn auth() {
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => error!("{}", e),
    };

    match spotify::auth::auth(credentials).await {
        Ok(token) => {
            success!("Authentication successful!");
            println!("\n{}\n", token.refresh_token);
            info!("Copy the refresh token above into REFRESH_TOKEN in your .env file.");
        }
        Err(e) => error!("{}", e),
    }
}
