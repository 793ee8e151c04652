//! Static table of Slack emoji codes and their Unicode equivalents.

use std::collections::HashMap;
use std::sync::LazyLock;

const EMOJI_CODES: &[(&str, &str)] = &[
    (":+1:", "👍"),
    (":-1:", "👎"),
    (":thumbsup:", "👍"),
    (":thumbsdown:", "👎"),
    (":ok_hand:", "👌"),
    (":wave:", "👋"),
    (":clap:", "👏"),
    (":raised_hands:", "🙌"),
    (":pray:", "🙏"),
    (":muscle:", "💪"),
    (":point_up:", "☝️"),
    (":point_down:", "👇"),
    (":point_left:", "👈"),
    (":point_right:", "👉"),
    (":fist:", "✊"),
    (":v:", "✌️"),
    (":eyes:", "👀"),
    (":smile:", "😄"),
    (":smiley:", "😃"),
    (":grinning:", "😀"),
    (":grin:", "😁"),
    (":laughing:", "😆"),
    (":satisfied:", "😆"),
    (":sweat_smile:", "😅"),
    (":joy:", "😂"),
    (":rofl:", "🤣"),
    (":slightly_smiling_face:", "🙂"),
    (":upside_down_face:", "🙃"),
    (":wink:", "😉"),
    (":blush:", "😊"),
    (":innocent:", "😇"),
    (":heart_eyes:", "😍"),
    (":kissing_heart:", "😘"),
    (":yum:", "😋"),
    (":stuck_out_tongue:", "😛"),
    (":stuck_out_tongue_winking_eye:", "😜"),
    (":sunglasses:", "😎"),
    (":nerd_face:", "🤓"),
    (":smirk:", "😏"),
    (":unamused:", "😒"),
    (":disappointed:", "😞"),
    (":pensive:", "😔"),
    (":worried:", "😟"),
    (":confused:", "😕"),
    (":slightly_frowning_face:", "🙁"),
    (":persevere:", "😣"),
    (":confounded:", "😖"),
    (":tired_face:", "😫"),
    (":weary:", "😩"),
    (":cry:", "😢"),
    (":sob:", "😭"),
    (":triumph:", "😤"),
    (":angry:", "😠"),
    (":rage:", "😡"),
    (":no_mouth:", "😶"),
    (":neutral_face:", "😐"),
    (":expressionless:", "😑"),
    (":hushed:", "😯"),
    (":frowning:", "😦"),
    (":anguished:", "😧"),
    (":open_mouth:", "😮"),
    (":astonished:", "😲"),
    (":sleeping:", "😴"),
    (":drooling_face:", "🤤"),
    (":sleepy:", "😪"),
    (":dizzy_face:", "😵"),
    (":zipper_mouth_face:", "🤐"),
    (":nauseated_face:", "🤢"),
    (":sneezing_face:", "🤧"),
    (":mask:", "😷"),
    (":thinking_face:", "🤔"),
    (":thinking:", "🤔"),
    (":face_with_rolling_eyes:", "🙄"),
    (":scream:", "😱"),
    (":flushed:", "😳"),
    (":hugging_face:", "🤗"),
    (":shushing_face:", "🤫"),
    (":exploding_head:", "🤯"),
    (":partying_face:", "🥳"),
    (":skull:", "💀"),
    (":ghost:", "👻"),
    (":alien:", "👽"),
    (":robot_face:", "🤖"),
    (":poop:", "💩"),
    (":hankey:", "💩"),
    (":see_no_evil:", "🙈"),
    (":hear_no_evil:", "🙉"),
    (":speak_no_evil:", "🙊"),
    (":heart:", "❤️"),
    (":yellow_heart:", "💛"),
    (":green_heart:", "💚"),
    (":blue_heart:", "💙"),
    (":purple_heart:", "💜"),
    (":black_heart:", "🖤"),
    (":broken_heart:", "💔"),
    (":sparkling_heart:", "💖"),
    (":two_hearts:", "💕"),
    (":100:", "💯"),
    (":boom:", "💥"),
    (":collision:", "💥"),
    (":fire:", "🔥"),
    (":sparkles:", "✨"),
    (":star:", "⭐"),
    (":star2:", "🌟"),
    (":zap:", "⚡"),
    (":sunny:", "☀️"),
    (":cloud:", "☁️"),
    (":umbrella:", "☔"),
    (":snowflake:", "❄️"),
    (":rainbow:", "🌈"),
    (":tada:", "🎉"),
    (":confetti_ball:", "🎊"),
    (":balloon:", "🎈"),
    (":gift:", "🎁"),
    (":trophy:", "🏆"),
    (":medal:", "🏅"),
    (":rocket:", "🚀"),
    (":airplane:", "✈️"),
    (":car:", "🚗"),
    (":bike:", "🚲"),
    (":coffee:", "☕"),
    (":tea:", "🍵"),
    (":beer:", "🍺"),
    (":beers:", "🍻"),
    (":wine_glass:", "🍷"),
    (":pizza:", "🍕"),
    (":hamburger:", "🍔"),
    (":fries:", "🍟"),
    (":taco:", "🌮"),
    (":cake:", "🍰"),
    (":cookie:", "🍪"),
    (":doughnut:", "🍩"),
    (":apple:", "🍎"),
    (":banana:", "🍌"),
    (":avocado:", "🥑"),
    (":white_check_mark:", "✅"),
    (":heavy_check_mark:", "✔️"),
    (":x:", "❌"),
    (":warning:", "⚠️"),
    (":no_entry:", "⛔"),
    (":question:", "❓"),
    (":exclamation:", "❗"),
    (":heavy_plus_sign:", "➕"),
    (":heavy_minus_sign:", "➖"),
    (":arrow_right:", "➡️"),
    (":arrow_left:", "⬅️"),
    (":arrow_up:", "⬆️"),
    (":arrow_down:", "⬇️"),
    (":recycle:", "♻️"),
    (":bulb:", "💡"),
    (":memo:", "📝"),
    (":pencil2:", "✏️"),
    (":pushpin:", "📌"),
    (":paperclip:", "📎"),
    (":link:", "🔗"),
    (":lock:", "🔒"),
    (":unlock:", "🔓"),
    (":key:", "🔑"),
    (":hammer:", "🔨"),
    (":wrench:", "🔧"),
    (":gear:", "⚙️"),
    (":package:", "📦"),
    (":calendar:", "📆"),
    (":date:", "📅"),
    (":clock1:", "🕐"),
    (":hourglass:", "⌛"),
    (":alarm_clock:", "⏰"),
    (":bell:", "🔔"),
    (":mega:", "📣"),
    (":loudspeaker:", "📢"),
    (":speech_balloon:", "💬"),
    (":email:", "📧"),
    (":envelope:", "✉️"),
    (":computer:", "💻"),
    (":keyboard:", "⌨️"),
    (":iphone:", "📱"),
    (":bug:", "🐛"),
    (":dog:", "🐶"),
    (":cat:", "🐱"),
    (":mouse:", "🐭"),
    (":rabbit:", "🐰"),
    (":fox_face:", "🦊"),
    (":bear:", "🐻"),
    (":panda_face:", "🐼"),
    (":koala:", "🐨"),
    (":tiger:", "🐯"),
    (":lion_face:", "🦁"),
    (":cow:", "🐮"),
    (":pig:", "🐷"),
    (":frog:", "🐸"),
    (":monkey_face:", "🐵"),
    (":chicken:", "🐔"),
    (":penguin:", "🐧"),
    (":bird:", "🐦"),
    (":unicorn_face:", "🦄"),
    (":bee:", "🐝"),
    (":honeybee:", "🐝"),
    (":turtle:", "🐢"),
    (":snake:", "🐍"),
    (":octopus:", "🐙"),
    (":crab:", "🦀"),
    (":whale:", "🐳"),
    (":dolphin:", "🐬"),
    (":fish:", "🐟"),
    (":shipit:", "🐿️"),
    (":squirrel:", "🐿️"),
    (":seedling:", "🌱"),
    (":evergreen_tree:", "🌲"),
    (":palm_tree:", "🌴"),
    (":cactus:", "🌵"),
    (":four_leaf_clover:", "🍀"),
    (":rose:", "🌹"),
    (":sunflower:", "🌻"),
    (":earth_americas:", "🌎"),
    (":globe_with_meridians:", "🌐"),
    (":crescent_moon:", "🌙"),
    (":moneybag:", "💰"),
    (":dollar:", "💵"),
    (":chart_with_upwards_trend:", "📈"),
    (":chart_with_downwards_trend:", "📉"),
    (":bar_chart:", "📊"),
    (":mag:", "🔍"),
    (":construction:", "🚧"),
    (":rotating_light:", "🚨"),
    (":checkered_flag:", "🏁"),
    (":ok:", "🆗"),
    (":new:", "🆕"),
    (":free:", "🆓"),
    (":cool:", "🆒"),
    (":sos:", "🆘"),
    (":zzz:", "💤"),
    (":sweat_drops:", "💦"),
    (":dash:", "💨"),
    (":musical_note:", "🎵"),
    (":notes:", "🎶"),
    (":headphones:", "🎧"),
    (":video_game:", "🎮"),
    (":dart:", "🎯"),
    (":game_die:", "🎲"),
    (":soccer:", "⚽"),
    (":basketball:", "🏀"),
    (":football:", "🏈"),
    (":tennis:", "🎾"),
    (":man_shrugging:", "🤷‍♂️"),
    (":woman_shrugging:", "🤷‍♀️"),
    (":shrug:", "🤷"),
    (":facepalm:", "🤦"),
    (":handshake:", "🤝"),
    (":writing_hand:", "✍️"),
    (":crossed_fingers:", "🤞"),
    (":call_me_hand:", "🤙"),
    (":metal:", "🤘"),
    (":raised_hand:", "✋"),
    (":smiling_imp:", "😈"),
    (":imp:", "👿"),
    (":clown_face:", "🤡"),
    (":cowboy_hat_face:", "🤠"),
    (":money_mouth_face:", "🤑"),
    (":lying_face:", "🤥"),
    (":star_struck:", "🤩"),
    (":face_with_monocle:", "🧐"),
    (":pleading_face:", "🥺"),
    (":hot_face:", "🥵"),
    (":cold_face:", "🥶"),
    (":woozy_face:", "🥴"),
    (":yawning_face:", "🥱"),
    (":heavy_heart_exclamation_mark_ornament:", "❣️"),
];

static EMOJI_CODEMAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| EMOJI_CODES.iter().copied().collect());

/// Unicode equivalent of a colon-delimited emoji code such as `":tada:"`.
#[must_use]
pub fn lookup(code: &str) -> Option<&'static str> {
    EMOJI_CODEMAP.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(lookup(":thumbsup:"), Some("👍"));
        assert_eq!(lookup(":+1:"), Some("👍"));
        assert_eq!(lookup(":tada:"), Some("🎉"));
    }

    #[test]
    fn codes_need_colons() {
        assert_eq!(lookup("thumbsup"), None);
        assert_eq!(lookup(":not_an_emoji:"), None);
    }
}
