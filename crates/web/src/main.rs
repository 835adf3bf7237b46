use std::sync::Arc;

use database::{DatabaseConnectionInfo, PgDatabase};
use engine::clients::payment::PaymentClient;
use engine::clients::receipt::ReceiptClient;
use engine::clients::sms::SmsClient;
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    let payment = Arc::new(
        PaymentClient::from_env().expect("PAYSTACK_SECRET_KEY must be set to verify payments"),
    );
    let receipt = ReceiptClient::from_env().map(Arc::new);
    let sms = SmsClient::from_env().map(Arc::new);

    let state = WebState {
        database,
        payment,
        receipt,
        sms,
    };

    start_web_server(state).await.expect("web server crashed");
}
