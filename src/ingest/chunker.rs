//! Fixed-window text splitter with overlap.
//!
//! Splits on a character window so that every chunk is at most `chunk_size`
//! chars, stepping by up to `chunk_size - overlap` so context spanning a
//! boundary appears in both neighbors. Within a window the cut prefers a sentence
//! ending found in the last 20% of the text.

pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    let mut chunks = Vec::new();
    if total == 0 || chunk_size == 0 {
        return chunks;
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut start = 0;

    while start < total {
        let end = (start + chunk_size).min(total);
        let window: String = chars[start..end].iter().collect();

        let piece = if end < total {
            cut_at_sentence_boundary(&window)
        } else {
            window
        };
        let consumed = piece.chars().count();

        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end == total {
            break;
        }
        // Step from the actual cut, not the full window, so text between a
        // sentence cut and the window end lands in the next chunk.
        start += consumed.saturating_sub(overlap).max(1).min(step);
    }

    // A file of pure whitespace still counts as empty input.
    chunks
}

/// Prefer a sentence ending in the final 20% of the window; otherwise keep the
/// full window.
fn cut_at_sentence_boundary(window: &str) -> String {
    let endings = [". ", "! ", "? ", ".\n", "!\n", "?\n", "다.", "요."];

    let char_count = window.chars().count();
    let search_start_chars = (char_count * 80) / 100;
    let search_start = window
        .char_indices()
        .nth(search_start_chars)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let tail = &window[search_start..];

    for ending in endings.iter() {
        if let Some(pos) = tail.rfind(ending) {
            let cut = search_start + pos + ending.len();
            return window[..cut].to_string();
        }
    }

    window.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_yields_at_least_one_chunk() {
        let chunks = split_text("hello", 800, 200);
        assert_eq!(chunks, vec!["hello"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_text("", 800, 200).is_empty());
        assert!(split_text("   \n  ", 800, 200).is_empty());
    }

    #[test]
    fn every_chunk_fits_the_window() {
        let text = "This is a sentence. ".repeat(200);
        let chunks = split_text(&text, 100, 30);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn neighboring_chunks_overlap() {
        // No sentence endings, so windows are cut at exactly chunk_size.
        let text: String = ('a'..='z').cycle().take(300).collect();
        let chunks = split_text(&text, 100, 40);

        let first_tail: String = chunks[0].chars().rev().take(40).collect();
        let second_head: String = chunks[1].chars().take(40).collect();
        let first_tail: String = first_tail.chars().rev().collect();
        assert_eq!(first_tail, second_head);
    }

    #[test]
    fn prefers_sentence_boundary_near_window_end() {
        let text = format!("{} End of story. And then some trailing words", "x".repeat(80));
        let chunks = split_text(&text, 100, 0);
        assert!(chunks[0].ends_with("End of story."));
    }

    #[test]
    fn text_after_a_sentence_cut_lands_in_the_next_chunk() {
        // The cut at the ". " shortens the first window; the tail of that
        // window must still make it into a later chunk.
        let marker = "UNIQUEMARKER123456";
        let text = format!("{}. {}{}", "x".repeat(85), marker, "y".repeat(40));

        let chunks = split_text(&text, 100, 0);

        assert!(chunks[0].ends_with("."));
        assert!(chunks.iter().any(|c| c.contains(marker)));
    }

    #[test]
    fn zero_overlap_preserves_every_character() {
        let text = "문장이 하나 있어요. ".repeat(30);
        let chunks = split_text(&text, 64, 0);

        let rejoined: String = chunks.join("");
        let original: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let restored: String = rejoined.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(restored, original);
    }

    #[test]
    fn splitting_is_deterministic() {
        let text = "반복되는 문장입니다. ".repeat(100);
        let a = split_text(&text, 120, 30);
        let b = split_text(&text, 120, 30);
        assert_eq!(a, b);
    }
}
