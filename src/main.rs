#[cfg(feature = "http")]
use roster_db::Roster;
#[cfg(feature = "http")]
use std::sync::Arc;

// One store, one collection, shared by every request.
#[cfg(feature = "http")]
const DB_PATH: &str = "userdata";
#[cfg(feature = "http")]
const COLLECTION: &str = "users";

#[cfg(feature = "http")]
fn setup_store() -> std::io::Result<Arc<Roster>> {
    let db = Arc::new(
        Roster::open(DB_PATH)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?,
    );
    println!("💽 Record store opened at '{}'", DB_PATH);
    Ok(db)
}

#[cfg(feature = "http")]
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db = setup_store()?;

    use roster_db::network::http_server::run_http_server;
    println!("🌐 Record store listening at http://127.0.0.1:3000");
    run_http_server(db, COLLECTION, "127.0.0.1:3000").await
}

#[cfg(not(feature = "http"))]
fn main() {
    println!("No server features enabled.");
    println!("To run the record-store server, build with the http feature:");
    println!("  cargo run --bin roster-db --features http");
}
