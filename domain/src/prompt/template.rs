//! Prompt templates for debate, planning, rating and file selection

use crate::selection::{IgnoredFile, InspectedFile};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    // ==================== Debate ====================

    /// User turn for one member in a refinement round: its own latest
    /// answer plus the latest answers of its two ring neighbours.
    pub fn debate_refinement(user_message: &str, own: &str, left: &str, right: &str) -> String {
        format!(
            r#"<user-message>
{user_message}
</user-message>

<initial-response>
{own}
</initial-response>

Following are responses generated by other assistants:
<assistant-response-1>
{left}
</assistant-response-1>

<assistant-response-2>
{right}
</assistant-response-2>

Use the insights from all the responses to refine and update your response to the user message.
Do not mention the multiple responses provided.
Ensure any relevant response formatting instructions are followed."#
        )
    }

    /// User turn for the mediator, listing every final-round answer.
    pub fn mediation(user_message: &str, responses: &[String]) -> String {
        let listed = responses
            .iter()
            .enumerate()
            .map(|(i, response)| {
                format!(
                    "<assistant-response-{n}>\n{response}\n</assistant-response-{n}>",
                    n = i + 1
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"<user-message>
{user_message}
</user-message>

Following are responses generated by other assistants:
{listed}

Look at the <user-message> again and use the insights from all the assistant responses to provide a final response. Do not mention the multiple responses provided.
Answer directly to the original user message and ensure any relevant response formatting instructions are followed."#
        )
    }

    // ==================== Planning ====================

    pub fn plan(question: &str) -> String {
        format!(
            "To answer this question, can you come up with a concise plan to solve it step-by-step but do not provide the final answer. \
Also, for each step, provide your confidence in the correctness of that step as well as your ability to execute it correctly. \
Here is the question:\n{question}"
        )
    }

    pub fn execute_plan() -> &'static str {
        "Can you execute the above plan step-by-step to produce the final answer. \
Be extra careful when executing steps where your confidence is lower."
    }

    /// Assistant turn presenting every execution to the refine step.
    pub fn combined_plans(executions: &[String]) -> String {
        executions
            .iter()
            .enumerate()
            .map(|(i, plan)| format!("Plan {}:\n{}", i + 1, plan))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn refine_plan(question: &str) -> String {
        format!(
            "Can you review the following plans and identify any inconsistencies between them. \
After that, can you address them and present a final step-by-step solution to the problem? \
Here is the question:\n{question}"
        )
    }

    pub fn final_answer(question: &str) -> String {
        format!(
            "Use your final solution from above to correctly answer the question. Here is the question:\n{question}"
        )
    }

    // ==================== Rating ====================

    pub fn absolute_rating() -> &'static str {
        r#"Please act as an impartial judge and evaluate the quality of the response provided by an AI assistant to the user question displayed below. Your evaluation should consider correctness as a primary factor as well as other factors such as helpfulness, relevance, accuracy, depth, creativity, and level of detail of the response.

Evaluation Criteria:
- Correctness: How free is it from errors or mistakes?
- Helpfulness: How effectively does the response meet the user's needs?
- Relevance: How directly does the response address the original question?
- Accuracy: Are the information and explanations factually correct?
- Depth: Does the response provide comprehensive and meaningful insights?
- Creativity: Does the response offer unique or innovative perspectives?
- Clarity: Is the response well-organized, coherent, and easy to understand?

Begin your evaluation by providing a short explanation. Be as objective as possible. After providing your explanation, please rate the response on a scale of 1 to 10 by strictly following this format: "Rating: [[rating]]", for example: "Rating: [[5]]""#
    }

    pub fn pairwise_rating() -> &'static str {
        r#"Please act as an impartial judge and compare the quality of the two responses provided by the AI assistant to the user's question displayed below. Evaluation Criteria:
- Helpfulness: How effectively does the response meet the user's needs?
- Relevance: How directly does the response address the original question?
- Accuracy: Are the information and explanations factually correct?
- Depth: Does the response provide comprehensive and meaningful insights?
- Creativity: Does the response offer unique or innovative perspectives?
- Clarity: Is the response well-organized, coherent, and easy to understand?

Evaluation Process:
1. Carefully review the user's question and the AI assistant's responses.
2. Compare the responses against each other for each criterion.
3. Provide a concise explanation of your overall evaluation.
4. Select the response that is superior based on the above criteria.

Reply with "Better Response: [[response id]]".
If the first response is better, reply with "Better Response: [[0]]".
If the second response is better, reply with "Better Response: [[1]]"."#
    }

    /// Assistant turn holding the two candidates of one comparison.
    pub fn response_pair(first: &str, second: &str) -> String {
        format!("Response 0: {first}\n\nResponse 1: {second}")
    }

    // ==================== File selection ====================

    pub fn selection_system(file_tree: &str) -> String {
        format!(
            r#"<project_files>
{file_tree}
</project_files>

Your task is to select the minimal, complete file set that will be required for completing the task/query in the requirements.

Always respond only in the format/instructions requested.

# Process Files Response Instructions

When requested to respond as per the Process Files Response Instructions you will need to select, extract or ignore each of the files you previously requested to inspect, giving a reason why.
Use extractFiles for large files where only a part is relevant, quoting that part.

Your response must end with a JSON object wrapped in <json> tags in the following format:
<json>
{{
  "selectFiles": [
    {{"path": "dir/file1", "reason": "...", "readonly": false}}
  ],
  "extractFiles": [
    {{"path": "dir/file2", "extract": "..."}}
  ],
  "ignoreFiles": [
    {{"path": "dir/file3", "reason": "..."}}
  ]
}}
</json>

# Next Step Response Instructions

When every inspected file has been resolved you may either request more files from <project_files>:
<json>
{{"inspectFiles": ["dir1/dir2/file4"]}}
</json>
or, if you have all the files required for the requirements task/query, finish with:
<json>
{{"complete": true}}
</json>
"#
        )
    }

    pub fn selection_initial(requirements: &str) -> String {
        format!(
            r#"<requirements>
{requirements}
</requirements>

# Initial Response Instructions

For this initial file selection step respond in the following format:
<observations-related-to-requirements>
</observations-related-to-requirements>
<select-files-thinking>
</select-files-thinking>
<json>
</json>

Your response must end with a JSON object wrapped in <json> tags in the following format:
<json>
{{
  "inspectFiles": ["dir/file1", "dir1/dir2/file2"]
}}
</json>
"#
        )
    }

    /// Contents of inspected files, with unreadable files annotated inline.
    pub fn file_contents(files: &[InspectedFile]) -> String {
        let mut out = String::from("<files>\n");
        for file in files {
            match &file.contents {
                Ok(contents) => out.push_str(&format!(
                    "<file_contents path=\"{}\">\n{}\n</file_contents>\n",
                    file.path, contents
                )),
                Err(reason) => out.push_str(&format!("Couldn't read {}: {}\n", file.path, reason)),
            }
        }
        out.push_str("</files>");
        out
    }

    /// User turn after an inspection: the contents and the paths to resolve.
    pub fn process_files(files: &[InspectedFile], pending: &[String]) -> String {
        format!(
            "{}\n\nThe files that must be included in either the selectFiles, extractFiles or ignoreFiles properties are:\n{}\n\nRespond only as per the Process Files Response Instructions.",
            Self::file_contents(files),
            pending.join("\n")
        )
    }

    /// Re-prompt listing only the staged paths still unresolved.
    pub fn resolve_remaining(remaining: &[String]) -> String {
        format!(
            "The following inspected files have not been resolved yet:\n{}\n\nEach of them must be included in either the selectFiles, extractFiles or ignoreFiles properties.\nRespond only as per the Process Files Response Instructions.",
            remaining.join("\n")
        )
    }

    /// User turn once every staged file is resolved.
    pub fn await_next(ignored: &[IgnoredFile]) -> String {
        let mut prompt = String::new();
        if !ignored.is_empty() {
            prompt.push_str("Removed the following ignored files:");
            for file in ignored {
                if file.reason.is_empty() {
                    prompt.push_str(&format!("\n{}", file.path));
                } else {
                    prompt.push_str(&format!("\n{} - {}", file.path, file.reason));
                }
            }
            prompt.push_str("\n\n");
        }
        prompt.push_str("All inspected files have been resolved. Respond only as per the Next Step Response Instructions.");
        prompt
    }

    pub fn query_answer(query: &str) -> String {
        format!(
            r#"<query>
{query}
</query>

Please provide a detailed answer to the query using the information from the available file contents, and including citations to the files where the relevant information was found.
Respond in the following format (Note only the contents of the result tag will be returned to the user):

<thinking></thinking>
<reflection></reflection>
<result></result>
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debate_refinement_layout() {
        let prompt = PromptTemplate::debate_refinement("Q?", "mine", "left", "right");
        assert!(prompt.starts_with("<user-message>\nQ?\n</user-message>"));
        assert!(prompt.contains("<initial-response>\nmine\n</initial-response>"));
        assert!(prompt.contains("<assistant-response-1>\nleft\n</assistant-response-1>"));
        assert!(prompt.contains("<assistant-response-2>\nright\n</assistant-response-2>"));
    }

    #[test]
    fn test_mediation_lists_all_responses() {
        let responses = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let prompt = PromptTemplate::mediation("Q?", &responses);
        assert!(prompt.contains("<assistant-response-3>\nc\n</assistant-response-3>"));
        assert!(!prompt.contains("<assistant-response-4>"));
    }

    #[test]
    fn test_combined_plans_numbering() {
        let plans = vec!["x".to_string(), "y".to_string()];
        assert_eq!(PromptTemplate::combined_plans(&plans), "Plan 1:\nx\n\nPlan 2:\ny");
    }

    #[test]
    fn test_rating_prompts_name_the_patterns() {
        assert!(PromptTemplate::absolute_rating().contains("Rating: [[5]]"));
        assert!(PromptTemplate::pairwise_rating().contains("Better Response: [[1]]"));
        assert_eq!(
            PromptTemplate::response_pair("a", "b"),
            "Response 0: a\n\nResponse 1: b"
        );
    }

    #[test]
    fn test_file_contents_annotates_unreadable() {
        let files = vec![
            InspectedFile::readable("src/a.rs", "fn a() {}"),
            InspectedFile::unreadable("missing.rs", "not found"),
        ];
        let text = PromptTemplate::file_contents(&files);
        assert!(text.contains("<file_contents path=\"src/a.rs\">\nfn a() {}\n</file_contents>"));
        assert!(text.contains("Couldn't read missing.rs: not found"));
        assert!(text.ends_with("</files>"));
    }

    #[test]
    fn test_resolve_remaining_lists_only_given_paths() {
        let prompt = PromptTemplate::resolve_remaining(&["b.rs".to_string()]);
        assert!(prompt.contains("b.rs"));
        assert!(!prompt.contains("a.rs"));
    }

    #[test]
    fn test_selection_system_embeds_tree() {
        let prompt = PromptTemplate::selection_system("src/\n  main.rs");
        assert!(prompt.contains("<project_files>\nsrc/\n  main.rs\n</project_files>"));
        assert!(prompt.contains(r#"{"complete": true}"#));
    }
}
