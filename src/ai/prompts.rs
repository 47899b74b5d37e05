//! Prompt builders for the generative-AI endpoints. The model is asked for
//! bare JSON; the reply still goes through `client::extract_json` because
//! models routinely wrap payloads in code fences anyway.

pub fn questions_prompt(
    role: &str,
    experience: &str,
    topics_to_focus: &str,
    number_of_questions: u32,
) -> String {
    format!(
        r#"You are an AI trained to generate technical interview questions and answers.

Task:
- Role: {role}
- Candidate Experience: {experience} years
- Focus Topics: {topics_to_focus}
- Write {number_of_questions} interview questions.
- For each question, generate a detailed but beginner-friendly answer.
- If the answer needs a code example, add a small code block inside.
- Keep formatting very clean.
- Return a pure JSON array like:

[
  {{
    "question": "Question here?",
    "answer": "Answer here."
  }},
  ...
]

Important: Do NOT add any extra text. Only return valid JSON."#
    )
}

pub fn explanation_prompt(question: &str) -> String {
    format!(
        r#"You are an AI trained to explain technical interview concepts.

Task:
- Explain the following interview question and its underlying concept in depth, as if teaching a beginner:
"{question}"
- If the explanation needs a code example, add a small code block inside.
- Keep formatting very clean.
- Return a pure JSON object like:

{{
  "title": "Short title here",
  "explanation": "Explanation here."
}}

Important: Do NOT add any extra text. Only return valid JSON."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_prompt_embeds_parameters() {
        let p = questions_prompt("Backend Engineer", "5", "Rust, SQL", 10);
        assert!(p.contains("Role: Backend Engineer"));
        assert!(p.contains("Candidate Experience: 5 years"));
        assert!(p.contains("Focus Topics: Rust, SQL"));
        assert!(p.contains("Write 10 interview questions"));
        assert!(p.contains("Only return valid JSON"));
    }

    #[test]
    fn explanation_prompt_embeds_question() {
        let p = explanation_prompt("What is a lifetime?");
        assert!(p.contains("\"What is a lifetime?\""));
        assert!(p.contains("\"title\""));
        assert!(p.contains("\"explanation\""));
    }
}
