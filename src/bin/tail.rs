// Connects, syncs the channel list and prints the latest messages of a channel.

use slag::core::config::AppConfig;
use slag::core::models::Message;
use slag::SlackError;
use slag::service::SlackService;
use slag::slack::SlackClient;
use tracing::info;

fn render(message: &Message) -> String {
    let mut line = format!(
        "[{}] <{}> {}",
        message.occurred_at.format("%H:%M"),
        message.author,
        message.content
    );
    if message.is_reply {
        line.insert_str(0, "  │ ");
    }
    for attachment in &message.attachments {
        line.push_str("\n      ");
        line.push_str(&attachment.content);
    }
    line
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    slag::setup_logging();

    let config = AppConfig::from_env().map_err(SlackError::ConfigError)?;
    let service = SlackService::connect(SlackClient::new(&config)?).await?;

    let channels = service.sync().await?;
    info!("{} channels", channels.len());
    for channel in &channels {
        let marker = match channel.presence.as_str() {
            "active" => "● ",
            "" => "",
            _ => "○ ",
        };
        println!("{marker}{}", channel.name);
    }

    // Optional channel name argument, defaulting to the first listed channel.
    let wanted = std::env::args().nth(1);
    let channel = match wanted {
        Some(name) => channels.iter().find(|c| c.name == name),
        None => channels.first(),
    };

    if let Some(channel) = channel {
        println!("\n#{}", channel.name);
        for message in service.messages(channel, config.history_count).await? {
            println!("{}", render(&message));
        }
        service.mark_as_read(&channel.id).await;
    }

    Ok(())
}
