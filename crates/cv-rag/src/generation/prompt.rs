//! Prompt templates for answer synthesis

use crate::index::SearchResult;

/// Prompt builder for questions against the CV index
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from search results
    pub fn build_context(results: &[SearchResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n\n{}\n\n",
                i + 1,
                result.chunk.source_label(),
                result.chunk.content
            ));
        }

        context.trim_end().to_string()
    }

    /// Build the question-answering prompt
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Context information is below.
---------------------
{context}
---------------------
Given the context information and not prior knowledge, answer the query.
Query: {question}
Answer: "#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    #[test]
    fn test_context_numbers_sources() {
        let results = vec![
            SearchResult {
                chunk: Chunk::new("resume.pdf".into(), "Staff Engineer at Acme".into(), Some(1), 0, 22, 0),
                similarity: 0.9,
            },
            SearchResult {
                chunk: Chunk::new("resume.pdf".into(), "BSc Physics".into(), Some(1), 22, 33, 1),
                similarity: 0.7,
            },
        ];

        let context = PromptBuilder::build_context(&results);
        assert!(context.starts_with("[1] resume.pdf, Page 1\n\nStaff Engineer at Acme"));
        assert!(context.contains("[2] resume.pdf, Page 1\n\nBSc Physics"));
    }

    #[test]
    fn test_qa_prompt_embeds_question_verbatim() {
        let prompt = PromptBuilder::build_qa_prompt("What is the candidate's title?", "ctx");
        assert!(prompt.contains("Query: What is the candidate's title?\nAnswer: "));
        assert!(prompt.contains("---------------------\nctx\n---------------------"));
    }
}
