use std::process::ExitCode;
use std::sync::Arc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use kartbot::logging::init_logging;
use kartbot::{
    ChannelContext, Config, Coordinator, InboundMessage, KartbotError, MemberId,
    MemoryStatsStore, StaticDirectory,
};

/// Console transport. Each stdin line is `name: message` for the configured
/// channel, or `dm name: message` for a direct message. Replies go to stdout.
#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.verbose);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "kartbot stopped");
            eprintln!("kartbot: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), KartbotError> {
    let engine = config.engine()?;
    let teams = config.team_table()?;

    let mut members = config.member_ids();
    if !members.contains(engine.bot()) {
        members.push(engine.bot().clone());
    }
    let directory = StaticDirectory::with_channel(&config.channel, members);

    let coordinator = Coordinator::new(
        engine,
        Arc::new(directory),
        Arc::new(teams),
        Arc::new(MemoryStatsStore::new()),
        config.seed,
    );
    info!(channel = %config.channel, capacity = config.capacity, "console session ready");
    println!("kartbot is listening on #{} (type `name: !help`)", config.channel);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(message) = parse_line(&line, &config.channel) else {
            if !line.trim().is_empty() {
                warn!(line = %line, "expected `name: message`");
            }
            continue;
        };
        for reply in coordinator.handle(&message).await {
            println!("{}", reply);
        }
    }
    Ok(())
}

fn parse_line(line: &str, channel: &str) -> Option<InboundMessage> {
    let (context, rest) = match line.trim().strip_prefix("dm ") {
        Some(rest) => (ChannelContext::Direct, rest),
        None => (ChannelContext::Channel(channel.to_string()), line.trim()),
    };
    let (author, text) = rest.split_once(':')?;
    let author = author.parse::<MemberId>().ok()?;
    Some(InboundMessage {
        channel: context,
        author,
        author_is_bot: false,
        text: text.trim().to_string(),
    })
}
