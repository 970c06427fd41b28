/// Assembles the knowledge base from ranked chunk texts under a word budget.
///
/// Chunks are taken in ranked order. A chunk that would overflow the remaining
/// budget is truncated to the remaining word count instead of dropped, so the
/// result is never empty as long as at least one chunk exists.
pub fn assemble_knowledge_base(texts: &[String], word_budget: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut used = 0;

    for text in texts {
        let remaining = word_budget.saturating_sub(used);
        if remaining == 0 {
            break;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        if words.len() <= remaining {
            parts.push(words.join(" "));
            used += words.len();
        } else {
            parts.push(words[..remaining].join(" "));
            used += remaining;
            break;
        }
    }

    parts.join("\n")
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_of_words(n: usize, word: &str) -> String {
        std::iter::repeat(word).take(n).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn full_then_truncated() {
        let texts = vec![chunk_of_words(500, "가"), chunk_of_words(400, "나")];
        let kb = assemble_knowledge_base(&texts, 800);

        assert_eq!(word_count(&kb), 800);
        assert_eq!(kb.matches('가').count(), 500);
        assert_eq!(kb.matches('나').count(), 300);
    }

    #[test]
    fn oversized_first_chunk_is_truncated_not_dropped() {
        let texts = vec![chunk_of_words(1200, "w")];
        let kb = assemble_knowledge_base(&texts, 800);

        assert_eq!(word_count(&kb), 800);
        assert!(!kb.is_empty());
    }

    #[test]
    fn under_budget_chunks_are_kept_whole() {
        let texts = vec![chunk_of_words(100, "a"), chunk_of_words(200, "b")];
        let kb = assemble_knowledge_base(&texts, 800);
        assert_eq!(word_count(&kb), 300);
    }

    #[test]
    fn later_chunks_after_budget_hit_are_dropped() {
        let texts = vec![
            chunk_of_words(800, "a"),
            chunk_of_words(10, "b"),
            chunk_of_words(10, "c"),
        ];
        let kb = assemble_knowledge_base(&texts, 800);
        assert_eq!(word_count(&kb), 800);
        assert!(!kb.contains('b'));
        assert!(!kb.contains('c'));
    }

    #[test]
    fn empty_input_yields_empty_kb() {
        assert!(assemble_knowledge_base(&[], 800).is_empty());
    }
}
