// Example: creating a passkey smart wallet
//
// This example demonstrates how to:
// 1. Load the deployment and endpoints from the environment (.env supported)
// 2. Pick a random sequence id and derive the wallet, wallet-data and authority PDAs
// 3. Assemble the unsigned init transaction against a live RPC node

use p256::ecdsa::SigningKey;
use smart_wallet_sdk::{SdkConfig, SmartWalletClient};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SdkConfig::from_env()?;
    let rpc = RpcClient::new(config.rpc_url.clone());
    let client = SmartWalletClient::new(rpc, config.deployment.clone());

    // A software passkey stands in for the platform authenticator here
    let passkey = SigningKey::random(&mut rand::rngs::OsRng);
    let passkey_bytes = passkey.verifying_key().to_encoded_point(true).as_bytes().to_vec();

    let builder = client
        .init_wallet()
        .with_payer(Pubkey::new_unique()) // Replace with actual payer
        .with_passkey(passkey_bytes.clone());
    let addresses = builder.addresses()?;

    println!("Creating smart wallet:");
    println!("  Program: {}", client.program_id());
    println!("  Sequence id: {}", builder.sequence_id());
    println!("  Passkey: {}", hex::encode(&passkey_bytes));
    println!("  Wallet: {}", addresses.wallet);
    println!("  Wallet data: {}", addresses.wallet_data);
    println!("  Authority: {}", addresses.authority);

    match builder.build_transaction(client.connection()).await {
        Ok(tx) => {
            println!("  Blockhash: {}", tx.message.recent_blockhash);
            println!("  Instructions: {}", tx.message.instructions.len());
            // Sign with the payer and submit, or hand it to the relayer:
            // let relay = RelayClient::new(config.relayer_url.unwrap());
            // relay.sign_and_send_transaction(&tx).await?;
        },
        Err(e) => println!("  Could not reach {}: {e}", config.rpc_url),
    }

    Ok(())
}
