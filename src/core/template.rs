use serde::{Deserialize, Serialize};

/// A reusable prompt template: an agent identity plus body content.
///
/// The body may contain `{{variable}}` placeholders that are filled in
/// at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Unique display name; used as the lookup key in the store.
    pub name: String,
    /// Agent persona, e.g. "Senior Software Engineer".
    #[serde(default)]
    pub role: String,
    /// What the agent is trying to achieve.
    #[serde(default)]
    pub goal: String,
    /// Template body with optional `{{variable}}` placeholders.
    pub content: String,
}

impl PromptTemplate {
    /// Creates a template with an empty role and goal.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: String::new(),
            goal: String::new(),
            content: content.into(),
        }
    }
}

/// The built-in template set, served when the store holds no templates.
#[must_use]
pub fn builtin_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate {
            name: "Customer Support Agent".to_string(),
            role: "Customer Support Specialist".to_string(),
            goal: "Assist customers with empathy and efficiency to resolve their issues."
                .to_string(),
            content: "Customer Issue: {{issue}}\nCustomer Name: {{customer_name}}\n\nPlease provide a polite and helpful response to the customer.".to_string(),
        },
        PromptTemplate {
            name: "Blog Post Generator".to_string(),
            role: "Professional Content Writer".to_string(),
            goal: "Write engaging, SEO-optimized blog posts.".to_string(),
            content: "Write a comprehensive blog post about {{topic}}.\n\nTarget Audience: {{audience}}\nKey Points to Cover:\n- {{point1}}\n- {{point2}}\n- {{point3}}\n\nThe tone should be {{tone}}.".to_string(),
        },
        PromptTemplate {
            name: "Code Reviewer".to_string(),
            role: "Senior Software Engineer".to_string(),
            goal: "Ensure code quality, performance, and maintainability.".to_string(),
            content: "Review the following code snippet for bugs, performance issues, and best practices.\n\nLanguage: {{language}}\nCode:\n{{code_snippet}}\n\nProvide a detailed analysis and suggested improvements.".to_string(),
        },
        PromptTemplate {
            name: "Data Extractor".to_string(),
            role: "Data Analyst".to_string(),
            goal: "Extract structured data from unstructured text accurately.".to_string(),
            content: "Extract the following fields from the text below and format the output as JSON.\n\nFields to Extract: {{fields}}\nText:\n{{text_content}}".to_string(),
        },
        PromptTemplate {
            name: "CV Builder".to_string(),
            role: "Expert Career Coach".to_string(),
            goal: "Create professional, high-impact resumes that pass ATS systems.".to_string(),
            content: "Create a professional resume for the following candidate.\n\nName: {{name}}\nExperience: {{experience}}\nSkills: {{skills}}\nTarget Job: {{target_job}}\n\nFormat the output as a clean, modern resume.".to_string(),
        },
        PromptTemplate {
            name: "CV Checker".to_string(),
            role: "Senior Recruiter".to_string(),
            goal: "Critique resumes and provide actionable feedback for improvement.".to_string(),
            content: "Analyze the following resume for the position of {{position}}.\n\nResume Text:\n{{resume_text}}\n\nProvide feedback on:\n1. Formatting\n2. Content Impact\n3. Keyword Optimization\n4. Overall Impression".to_string(),
        },
        PromptTemplate {
            name: "Learning Assistant".to_string(),
            role: "Patient Tutor".to_string(),
            goal: "Explain complex concepts in simple, easy-to-understand terms.".to_string(),
            content: "Explain the concept of {{concept}} to a {{audience_level}}.\n\nUse analogies and examples to make it clear.\n\nSpecific questions to answer:\n- {{question1}}".to_string(),
        },
    ]
}
