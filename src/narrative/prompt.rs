/// Generation prompt for one dish.
#[must_use]
pub fn build_prompt(query: &str) -> String {
    format!(
        "Analyze the detailed historical evolution, global impact, and cultural significance of: \"{query}\".\n\
         Provide coordinates for all geographical locations mentioned.\n\
         Detail how the dish is perceived culturally in its origin regions.\n\
         Research and present 3-5 notable modern adaptations or fusion variations found in different parts of the world."
    )
}

#[cfg(test)]
mod tests {
    use super::build_prompt;

    #[test]
    fn prompt_quotes_the_dish_and_asks_for_coordinates() {
        let prompt = build_prompt("Paella");
        assert!(prompt.contains("of: \"Paella\"."));
        assert!(prompt.contains("coordinates for all geographical locations"));
        assert!(prompt.contains("3-5 notable modern adaptations"));
    }
}
