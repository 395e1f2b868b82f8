use rand::Rng;

/// The canned replies, in a fixed order. The last one echoes the user's message.
pub fn replies(user_message: &str) -> [String; 4] {
    [
        "Alpha Soil is busy right now. Try again in a moment.".to_string(),
        "I'm thinking... please wait a bit!".to_string(),
        "AI is temporarily unavailable. Let's continue soon.".to_string(),
        format!(
            "You said: \"{}\". Alpha Soil will respond properly shortly!",
            user_message
        ),
    ]
}

/// Uniform pick over `replies`.
pub fn pick(user_message: &str) -> String {
    let mut replies = replies(user_message);
    let index = rand::thread_rng().gen_range(0..replies.len());
    std::mem::take(&mut replies[index])
}
