use battlenet::BattleNetClient;

// Print the current WoW token price using CLIENT_ID and CLIENT_SECRET from the environment
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let client = BattleNetClient::new(
        std::env::var("CLIENT_ID")?,
        std::env::var("CLIENT_SECRET")?,
    )?;
    match client.wow_token_price().await {
        Some(snapshot) => println!("{} gold ({})", snapshot.price, snapshot.observed_at),
        None => println!("no price available"),
    }
    Ok(())
}
