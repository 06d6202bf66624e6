//! Prompt construction for concept analysis.
//!
//! Pure functions of the validated query — no I/O, byte-identical output
//! for identical input. The output schema (two top-level keys, 5–12
//! `unique` items per concept) is stated verbatim in the prompt because
//! the response parser enforces those bounds mechanically and has no
//! repair or negotiation step.

use super::query::ConceptQuery;

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a concept analysis expert. \
Analyze the relationships between the given concepts and respond with JSON only. \
Let the number of items follow from the actual relationships — never pad or \
force counts.";

/// Build the user prompt for a validated query.
///
/// Single-concept queries request one record with an explicitly empty
/// `shared_concepts` array. Multi-concept queries request one record per
/// concept plus a `shared_concepts` array whose length is deliberately
/// left to the model (zero is acceptable).
pub fn build_analysis_prompt(query: &ConceptQuery) -> String {
    if query.is_single() {
        single_concept_prompt(&query.concepts()[0])
    } else {
        multi_concept_prompt(query.concepts())
    }
}

fn single_concept_prompt(concept: &str) -> String {
    format!(
        r#"Analyze the following concept and respond in JSON form: "{concept}"

Report the concept's characteristics, sub-topics, and related techniques in this format:

{{
    "concepts": [
        {{"name": "{concept}", "unique": ["attribute1", "attribute2", "attribute3", "attribute4", "attribute5", "..."]}}
    ],
    "shared_concepts": []
}}

Requirements:
1. unique array: the concept's core characteristics, components, related techniques, and application areas (5-12 items)
2. shared_concepts: set to an empty array, since there is a single concept
3. Include only attributes that are genuinely meaningful and important
4. Keep every term short and easy to understand
5. Respond with terms in Korean; English is acceptable where no natural Korean equivalent exists
6. Respond with the JSON only — no surrounding explanation

Analyze the concept's core, representative characteristics naturally."#
    )
}

fn multi_concept_prompt(concepts: &[String]) -> String {
    let count = concepts.len();
    let listed = concepts
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let trailing = if count > 2 { ",\n        ..." } else { "" };

    format!(
        r#"Analyze the following {count} concepts and respond in JSON form: {listed}

Find each concept's distinguishing attributes and the points they share, in this format:

{{
    "concepts": [
        {{"name": "{first}", "unique": ["unique1", "unique2", "unique3", "unique4", "unique5", "..."]}},
        {{"name": "{second}", "unique": ["unique1", "unique2", "unique3", "unique4", "unique5", "..."]}}{trailing}
    ],
    "shared_concepts": ["shared1", "shared2", "shared3", "..."]
}}

Requirements:
1. unique array: attributes, techniques, and methods specific to each concept (5-12 items, flexible by actual relevance)
2. shared_concepts: points all the concepts share — let the count follow naturally from how much they truly have in common
3. Never force counts; include only genuinely meaningful items
4. Keep every term short and easy to understand
5. Respond with terms in Korean; English is acceptable where no natural Korean equivalent exists
6. Respond with the JSON only — no surrounding explanation

Loosely related concepts may share little and closely related ones may share much. Analyze naturally."#,
        first = concepts[0],
        second = concepts[1],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(entries: &[&str]) -> ConceptQuery {
        let raw: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
        ConceptQuery::parse(&raw).unwrap()
    }

    #[test]
    fn prompt_is_deterministic() {
        let q = query(&["neural network", "decision tree"]);
        assert_eq!(build_analysis_prompt(&q), build_analysis_prompt(&q));
    }

    #[test]
    fn single_prompt_requests_empty_shared_concepts() {
        let prompt = build_analysis_prompt(&query(&["neural network"]));
        assert!(prompt.contains("\"shared_concepts\": []"));
        assert!(prompt.contains("empty array"));
        assert!(prompt.contains("neural network"));
    }

    #[test]
    fn single_prompt_states_unique_bounds() {
        let prompt = build_analysis_prompt(&query(&["AI"]));
        assert!(prompt.contains("5-12 items"));
    }

    #[test]
    fn multi_prompt_never_fixes_shared_count() {
        let prompt = build_analysis_prompt(&query(&["AI", "ML"]));
        assert!(!prompt.contains("\"shared_concepts\": []"));
        assert!(prompt.contains("follow naturally"));
        assert!(prompt.contains("5-12 items"));
    }

    #[test]
    fn multi_prompt_lists_every_concept() {
        let prompt = build_analysis_prompt(&query(&["AI", "ML", "statistics"]));
        assert!(prompt.contains("\"AI\""));
        assert!(prompt.contains("\"ML\""));
        assert!(prompt.contains("\"statistics\""));
        assert!(prompt.contains("3 concepts"));
    }

    #[test]
    fn multi_prompt_extends_example_past_two_concepts() {
        let two = build_analysis_prompt(&query(&["AI", "ML"]));
        let three = build_analysis_prompt(&query(&["AI", "ML", "statistics"]));
        // The three-concept example elides further records with an ellipsis.
        assert!(!two.contains(",\n        ..."));
        assert!(three.contains(",\n        ..."));
    }

    #[test]
    fn both_templates_state_top_level_schema() {
        for q in [query(&["AI"]), query(&["AI", "ML"])] {
            let prompt = build_analysis_prompt(&q);
            assert!(prompt.contains("\"concepts\""));
            assert!(prompt.contains("\"shared_concepts\""));
            assert!(prompt.contains("JSON only"));
        }
    }

    #[test]
    fn system_prompt_forbids_forced_counts() {
        assert!(ANALYSIS_SYSTEM_PROMPT.contains("JSON only"));
        assert!(ANALYSIS_SYSTEM_PROMPT.contains("never pad"));
    }
}
