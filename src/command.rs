use rand::Rng;
use rand::seq::SliceRandom;
use crate::game::Game;
use crate::member::MemberId;

const GREETINGS: [&str; 7] = [
    "why aren't you playing right now?",
    "good time to kart!",
    "you look nice today!",
    "it's a good day for some trash talk!",
    "go play some FIFA!",
    "there appears to be a severe lack of gaming in this channel.",
    "what's your favourite game on the Wii and why is it Mario Kart?",
];

/// A chat message the bot acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Greeting,
    Challenge { game: Game, targets: Vec<MemberId> },
    Join,
    Reject,
    List,
    Roll { args: Vec<String> },
    Stats { target: Option<MemberId> },
    Help,
}

impl Command {
    /// Parse raw message text. Returns `None` for chatter the bot ignores.
    pub fn parse(text: &str, bot: &MemberId) -> Option<Command> {
        let msg = text.to_lowercase();
        if msg.contains(&format!("hi {}", bot.as_str())) || msg.contains("hi fifabot") {
            return Some(Command::Greeting);
        }

        let mut words = msg.split_whitespace();
        let head = words.next()?;
        let rest: Vec<&str> = words.collect();

        let command = match head {
            "!kart" | "!fifa" | "!smash" => {
                let game = head.trim_start_matches('!').parse::<Game>().ok()?;
                Command::Challenge {
                    game,
                    targets: rest.iter().map(|w| MemberId::new(w)).collect(),
                }
            }
            "!join" => Command::Join,
            "!nokart" | "!nofifa" | "!nosmash" => Command::Reject,
            "!list" => Command::List,
            "!roll" => Command::Roll {
                args: rest.iter().map(|w| w.to_string()).collect(),
            },
            "!stats" => Command::Stats {
                target: rest.first().map(|w| MemberId::new(w)),
            },
            _ if msg.contains("!help") => Command::Help,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Greeting => "greeting",
            Command::Challenge { .. } => "challenge",
            Command::Join => "join",
            Command::Reject => "reject",
            Command::List => "list",
            Command::Roll { .. } => "roll",
            Command::Stats { .. } => "stats",
            Command::Help => "help",
        }
    }
}

pub fn greeting<R: Rng + ?Sized>(actor: &MemberId, rng: &mut R) -> String {
    let response = GREETINGS.choose(rng).copied().unwrap_or(GREETINGS[0]);
    format!("Hi {}, {}", actor.display_name(), response)
}

pub fn help(actor: &MemberId) -> Vec<String> {
    vec![
        format!("Hi {}! Possible commands are:", actor.display_name()),
        "> `!kart` - Challenge random channel members to Mario Kart".to_string(),
        "> `!fifa` - Challenge random channel members to Fifa with random teams".to_string(),
        "> `!smash` - Challenge random channel members to Smash Bros".to_string(),
        "> `!kart USER USER` - Challenge specific channel members".to_string(),
        "> `!join` - Join the current challenge if there's room".to_string(),
        "> `!nokart` / `!nofifa` / `!nosmash` - Reject the challenge :(".to_string(),
        "> `!list` - See who's currently challenged".to_string(),
        "> `!roll USER` - Challenge someone in the channel to a game of chance".to_string(),
        "> `!stats [USER]` - See how often someone has rolled and won".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bot() -> MemberId {
        MemberId::new("kartbot")
    }

    #[test]
    fn test_greeting_names_the_actor() {
        let mut rng = StdRng::seed_from_u64(5);
        let line = greeting(&MemberId::new("yoshi"), &mut rng);
        assert!(line.starts_with("Hi Yoshi, "));
        assert!(GREETINGS.iter().any(|g| line.ends_with(g)));
    }

    #[test]
    fn test_help_starts_with_salutation() {
        let lines = help(&MemberId::new("toad"));
        assert_eq!(lines[0], "Hi Toad! Possible commands are:");
        assert!(lines.iter().any(|l| l.contains("!join")));
    }

    #[test]
    fn test_name_matches_variant() {
        assert_eq!(Command::parse("!kart", &bot()).unwrap().name(), "challenge");
        assert_eq!(Command::parse("!roll luigi", &bot()).unwrap().name(), "roll");
    }
}
