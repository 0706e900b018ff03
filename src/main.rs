use clap::Parser;
use log::info;
use pzrcon::{Client, ClientConfig, Command};
use std::{error::Error, time::Duration};

/// Run a single administrative command against a Project Zomboid server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(short, long, default_value_t = 27015, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,
    #[arg(long, env = "RCON_PASSWORD", hide_env_values = true)]
    password: String,
    /// Seconds to wait for the server on connect and on each command.
    #[arg(long, default_value_t = 10)]
    timeout: u64,
    /// One of additem, adduser, addusertowhitelist, removeuserfromwhitelist,
    /// banid, unbanid, banuser, unbanuser, grantadmin, removeadmin, kickuser,
    /// servermsg, setaccesslevel, voiceban.
    command: Command,
    /// Passed to the server verbatim, joined by single spaces.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = ClientConfig::new(args.host, args.port, args.password)
        .with_timeout(Duration::from_secs(args.timeout));
    let mut client = Client::new(config)?;

    client.connect().await?;
    info!("connected to {}", client.config().endpoint());

    let result = client.send(args.command, &args.args.join(" ")).await;
    client.disconnect().await;

    println!("{}", result?);
    Ok(())
}
