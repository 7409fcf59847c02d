use clap::{Parser, Subcommand};
use revkz_geocode::AddressVerifier;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revkz-cli")]
#[command(about = "Kazakhstan address verification command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Verify that an address exists and print its coordinates as `lat,lng`
    Verify {
        /// City from the Kazakhstan whitelist (e.g., Алматы)
        #[arg(long)]
        city: String,
        /// Street address including the house number (e.g., "Сейфуллина 34")
        #[arg(long)]
        address: String,
    },
    /// List the accepted cities
    Cities,
    /// Normalize a Kazakhstan mobile number to +7XXXXXXXXXX
    Phone {
        /// Number as typed by the user (e.g., "+7 (701) 123-45-67")
        number: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = revkz_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cities = revkz_core::load_cities(config.cities_path.as_deref())?;

    match cli.command {
        Commands::Verify { city, address } => {
            let verifier = AddressVerifier::from_config(&config.geocoder, cities)?;
            match verifier.verify(&city, &address).await {
                Ok(result) => println!("{},{}", result.lat, result.lng),
                Err(err) => anyhow::bail!("{err} [{}]", err.code()),
            }
        }
        Commands::Cities => {
            for name in cities.names() {
                println!("{name}");
            }
        }
        Commands::Phone { number } => {
            let normalized = revkz_core::normalize_kz_phone(&number)?;
            println!("{normalized}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
