//! Prompt templates. Pure string assembly: no validation, no sanitization.

use crate::language::Language;

/// Prompt asking the model to review `code` and reply with nothing but a
/// JSON object in the analysis schema. Line numbers are 1-based.
pub fn build_analysis_prompt(code: &str, language: Language) -> String {
    format!(
        "You are an expert code analyzer. Analyze the following {lang} code for errors, \
         potential issues, and improvements.\n\
         \n\
         Code to analyze:\n\
         ```{lang}\n\
         {code}\n\
         ```\n\
         \n\
         Please provide a detailed analysis in the following JSON format:\n\
         {{\n\
         \x20 \"hasErrors\": boolean,\n\
         \x20 \"errors\": [\n\
         \x20   {{\n\
         \x20     \"line\": number,\n\
         \x20     \"column\": number (optional),\n\
         \x20     \"type\": \"error\" | \"warning\" | \"info\",\n\
         \x20     \"message\": \"Brief description of the issue\",\n\
         \x20     \"suggestion\": \"How to fix this issue\",\n\
         \x20     \"impact\": \"What will happen if this issue is not resolved\"\n\
         \x20   }}\n\
         \x20 ],\n\
         \x20 \"summary\": \"Overall summary of the code quality and main issues\",\n\
         \x20 \"suggestions\": [\"General improvement suggestions\"]\n\
         }}\n\
         \n\
         Important guidelines:\n\
         1. Be very specific about line numbers (count from 1)\n\
         2. Identify syntax errors, logical errors, performance issues, and best practice violations\n\
         3. Provide actionable suggestions for each issue\n\
         4. Explain the impact of each issue\n\
         5. Keep messages clear and beginner-friendly\n\
         6. Only return valid JSON, no additional text",
        lang = language,
        code = code,
    )
}

/// Prompt asking the model for source code only, no explanatory prose.
pub fn build_generation_prompt(description: &str, language: Language) -> String {
    format!(
        "You are an expert {lang} developer. Generate clean, well-commented, and \
         production-ready {lang} code based on the following request:\n\
         \n\
         Request: {request}\n\
         \n\
         Guidelines:\n\
         1. Write clean, readable code with proper formatting\n\
         2. Include helpful comments explaining the logic\n\
         3. Follow {lang} best practices and conventions\n\
         4. Make the code production-ready and robust\n\
         5. Include error handling where appropriate\n\
         6. Only return the code, no additional explanations\n\
         \n\
         Generate {lang} code:",
        lang = language,
        request = description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_embeds_code_verbatim() {
        let code = "def f(:\n    pass";
        let prompt = build_analysis_prompt(code, Language::Python);
        assert!(prompt.contains(code));
        assert!(prompt.contains("```python"));
        assert!(prompt.contains("\"hasErrors\": boolean"));
        assert!(prompt.contains("count from 1"));
    }

    #[test]
    fn generation_prompt_names_the_language() {
        let prompt = build_generation_prompt("factorial function", Language::Cpp);
        assert!(prompt.contains("expert cpp developer"));
        assert!(prompt.contains("Request: factorial function"));
        assert!(prompt.contains("no additional explanations"));
    }

    #[test]
    fn builder_is_deterministic() {
        let a = build_analysis_prompt("x = 1", Language::Python);
        let b = build_analysis_prompt("x = 1", Language::Python);
        assert_eq!(a, b);
    }
}
