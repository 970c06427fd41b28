/// Renders the instruction template. Both fields are substituted verbatim and
/// unescaped; the template text itself is configuration.
pub fn render_prompt(template: &str, knowledge_base: &str, user_question: &str) -> String {
    template
        .replace("{knowledge_base}", knowledge_base)
        .replace("{user_question}", user_question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_PROMPT_TEMPLATE;

    #[test]
    fn both_fields_present_verbatim() {
        let prompt = render_prompt(
            DEFAULT_PROMPT_TEMPLATE,
            "전세 보증금은 최대 5천만원까지 지원돼요.",
            "보증금 지원을 받을 수 있나요?",
        );

        assert!(prompt.contains("전세 보증금은 최대 5천만원까지 지원돼요."));
        assert!(prompt.contains("보증금 지원을 받을 수 있나요?"));
        assert!(!prompt.contains("{knowledge_base}"));
        assert!(!prompt.contains("{user_question}"));
    }

    #[test]
    fn fields_are_not_escaped() {
        let prompt = render_prompt("KB: {knowledge_base} Q: {user_question}", "<b> & \"", "a/b");
        assert!(prompt.contains("<b> & \""));
        assert!(prompt.contains("a/b"));
    }
}
