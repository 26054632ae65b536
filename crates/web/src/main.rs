use database::{DatabaseConnectionInfo, PgDatabase};
use territory::client::Client;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    // web server
    let config = WebConfig::from_env().expect("WEB_BIND_ADDRESS is not a socket address.");
    let web_future = start_web_server(
        config,
        WebState {
            territory_client: Client::new("REST API", database),
        },
    );

    if let Err(why) = web_future.await {
        log::error!("web server stopped: {}", why);
    }
}
