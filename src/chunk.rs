/// Split `text` into chunks of at most `max_words` whitespace-delimited words.
///
/// Words are packed greedily and never split; only the final chunk may fall
/// short of the budget. A budget of zero is treated as one word per chunk.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let max_words = max_words.max(1);
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::with_capacity(max_words.min(4096));

    for word in text.split_whitespace() {
        if current.len() + 1 > max_words {
            chunks.push(current.join(" "));
            current.clear();
        }
        current.push(word);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}
