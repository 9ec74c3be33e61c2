//! Prompt templates for the three protocols

use crate::core::model::AgentModel;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    // ==================== Review ====================

    /// System instruction for Agent A in Review
    pub fn coder_system() -> &'static str {
        "You are a fast coder. Write the code requested by the user. Be direct and provide the code."
    }

    /// System instruction for Agent B in Review
    pub fn reviewer_system() -> &'static str {
        "You are a senior code reviewer. Analyze the code, point out flaws, and provide the corrected version."
    }

    /// Prompt for Agent B, embedding the original prompt and A's final code
    pub fn review_prompt(prompt: &str, code: &str) -> String {
        format!(
            r#"Review the following code generated for the prompt: "{}".

Code:
{}

Act as a senior reviewer. If there are errors or improvements, point them out and provide the corrected code. If it's perfect, just say so."#,
            prompt, code
        )
    }

    // ==================== Companion ====================

    /// System instruction for Agent A in Companion
    pub fn architect_system() -> &'static str {
        "You are a software architect. The user wants to build an app. Provide a clear, step-by-step architecture and plan. Do not write the full code, just the structure and logic."
    }

    /// System instruction for Agent B in Companion
    pub fn developer_system() -> &'static str {
        "You are a developer. Write the code based on the provided architecture plan."
    }

    /// Prompt for Agent B, embedding the original prompt and A's final plan
    pub fn implementation_prompt(prompt: &str, plan: &str) -> String {
        format!(
            r#"Implement the following architecture plan for the prompt: "{}".

Plan:
{}

Write the actual code based on this plan."#,
            prompt, plan
        )
    }

    // ==================== Challenge ====================

    /// System instruction shared by both agents in Challenge
    pub fn challenge_system() -> &'static str {
        "You are competing in a coding challenge. Write the best possible code for the user's request."
    }

    // ==================== Labels ====================

    pub fn coder_label(model: &AgentModel) -> String {
        format!("{} (Coder)", model.name())
    }

    pub fn reviewer_label(model: &AgentModel) -> String {
        format!("{} (Reviewer)", model.name())
    }

    pub fn architect_label(model: &AgentModel) -> String {
        format!("{} (Architect)", model.name())
    }

    pub fn developer_label(model: &AgentModel) -> String {
        format!("{} (Developer)", model.name())
    }

    /// Challenge messages carry the plain model name
    pub fn challenger_label(model: &AgentModel) -> String {
        model.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_prompt_embeds_prompt_and_code() {
        let prompt = PromptTemplate::review_prompt("sort a list", "fn sort() {}");
        assert!(prompt.contains(r#"for the prompt: "sort a list"."#));
        assert!(prompt.contains("Code:\nfn sort() {}\n"));
        assert!(prompt.contains("senior reviewer"));
    }

    #[test]
    fn test_implementation_prompt_embeds_plan() {
        let prompt = PromptTemplate::implementation_prompt("todo app", "1. models\n2. views");
        assert!(prompt.contains(r#""todo app""#));
        assert!(prompt.contains("Plan:\n1. models\n2. views\n"));
        assert!(prompt.ends_with("Write the actual code based on this plan."));
    }

    #[test]
    fn test_labels() {
        let model = AgentModel::GPT_4O;
        assert_eq!(PromptTemplate::coder_label(&model), "GPT-4o (Coder)");
        assert_eq!(PromptTemplate::reviewer_label(&model), "GPT-4o (Reviewer)");
        assert_eq!(PromptTemplate::architect_label(&model), "GPT-4o (Architect)");
        assert_eq!(PromptTemplate::developer_label(&model), "GPT-4o (Developer)");
        assert_eq!(PromptTemplate::challenger_label(&model), "GPT-4o");
    }

    #[test]
    fn test_architect_forbids_full_code() {
        assert!(PromptTemplate::architect_system().contains("Do not write the full code"));
    }
}
