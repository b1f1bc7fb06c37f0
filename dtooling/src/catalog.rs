//! Built-in tool catalogue: argument tables and prompt rules.
//!
//! ```rust
//! use dtooling::catalog::{builtin_registry, style_suffix};
//!
//! let registry = builtin_registry();
//! assert!(registry.contains("code_review"));
//! assert_eq!(registry.len(), 7);
//! assert_eq!(style_suffix("sketch"), "pencil sketch, black and white, artistic");
//! ```

use dprovider::Prompt;
use serde_json::{Map, Value, json};

use crate::{ArgumentSchema, ArgumentSpec, ImagePlan, ToolArguments, ToolPlan, ToolRegistry};

pub const SMART_CONVERSATION: &str = "smart_conversation";
pub const CODE_REVIEW: &str = "code_review";
pub const README_GENERATION: &str = "readme_generation";
pub const UI_FEEDBACK: &str = "ui_feedback";
pub const GENERATE_IMAGE: &str = "generate_image";
pub const GENERATE_WEBSITE_BANNER: &str = "generate_website_banner";
pub const ENHANCE_PROMPT: &str = "enhance_prompt";

pub const SMART_CONVERSATION_BUDGET: u32 = 1000;
pub const CODE_REVIEW_BUDGET: u32 = 1500;
pub const README_GENERATION_BUDGET: u32 = 2000;
pub const UI_FEEDBACK_BUDGET: u32 = 1500;

const IMAGE_STYLES: [&str; 4] = ["realistic", "artistic", "cartoon", "sketch"];
const BANNER_STYLES: [&str; 4] = ["modern", "minimal", "corporate", "creative"];
const REVIEW_FOCUSES: [&str; 5] = [
    "performance",
    "security",
    "readability",
    "best-practices",
    "all",
];
const IMAGE_TYPES: [&str; 4] = ["photo", "illustration", "logo", "banner"];

const PROMPT_TIPS: [&str; 3] = [
    "Prompts written in English tend to work best",
    "Add style and quality descriptors",
    "Avoid overly complex descriptions",
];

pub fn builtin_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register_fn(
        SMART_CONVERSATION,
        "Have a conversation with the configured AI provider",
        ArgumentSchema::new()
            .with(ArgumentSpec::string("message", "User message").required())
            .with(ArgumentSpec::string("context", "Optional conversation context")),
        |args| Ok(ToolPlan::Text(conversation_prompt(args))),
    );

    registry.register_fn(
        CODE_REVIEW,
        "Review source code and suggest improvements",
        ArgumentSchema::new()
            .with(ArgumentSpec::string("code", "Code to review").required())
            .with(
                ArgumentSpec::string("language", "Programming language of the code")
                    .with_default("JavaScript"),
            )
            .with(
                ArgumentSpec::string("focus", "Review focus")
                    .with_allowed(REVIEW_FOCUSES)
                    .with_default("all"),
            ),
        |args| Ok(ToolPlan::Text(code_review_prompt(args))),
    );

    registry.register_fn(
        README_GENERATION,
        "Generate a README.md for a project",
        ArgumentSchema::new()
            .with(ArgumentSpec::string("project_info", "Project description").required())
            .with(ArgumentSpec::string("tech_stack", "Technologies used"))
            .with(ArgumentSpec::string_list("features", "Main features")),
        |args| Ok(ToolPlan::Text(readme_prompt(args))),
    );

    registry.register_fn(
        UI_FEEDBACK,
        "Analyze a UI design and suggest improvements",
        ArgumentSchema::new()
            .with(ArgumentSpec::string("ui_description", "Description of the UI").required())
            .with(
                ArgumentSpec::string("target_users", "Intended audience")
                    .with_default("general users"),
            )
            .with(ArgumentSpec::string("design_goals", "Design goals")),
        |args| Ok(ToolPlan::Text(ui_feedback_prompt(args))),
    );

    registry.register_fn(
        GENERATE_IMAGE,
        "Generate an image from a text prompt",
        ArgumentSchema::new()
            .with(ArgumentSpec::string("prompt", "Image description").required())
            .with(
                ArgumentSpec::string("style", "Image style")
                    .with_allowed(IMAGE_STYLES)
                    .with_default("realistic"),
            )
            .with(
                ArgumentSpec::boolean("save_locally", "Save the image to the image directory")
                    .with_default(true),
            ),
        |args| {
            let style = args.text("style");
            Ok(ToolPlan::Image(ImagePlan {
                prompt: styled_prompt(args.text("prompt"), style),
                style: style.to_string(),
                save: args.flag("save_locally"),
            }))
        },
    );

    registry.register_fn(
        GENERATE_WEBSITE_BANNER,
        "Generate a website banner image",
        ArgumentSchema::new()
            .with(ArgumentSpec::string("business_type", "Type of business").required())
            .with(ArgumentSpec::string("color_theme", "Primary color").with_default("blue"))
            .with(
                ArgumentSpec::string("style", "Banner style")
                    .with_allowed(BANNER_STYLES)
                    .with_default("modern"),
            ),
        |args| {
            let banner = banner_prompt(
                args.text("business_type"),
                args.text("color_theme"),
                args.text("style"),
            );
            Ok(ToolPlan::Image(ImagePlan {
                prompt: styled_prompt(&banner, "realistic"),
                style: "realistic".to_string(),
                save: true,
            }))
        },
    );

    registry.register_fn(
        ENHANCE_PROMPT,
        "Improve an image prompt with style and quality descriptors",
        ArgumentSchema::new()
            .with(ArgumentSpec::string("basic_prompt", "Prompt to enhance").required())
            .with(
                ArgumentSpec::string("image_type", "Kind of image")
                    .with_allowed(IMAGE_TYPES)
                    .with_default("photo"),
            ),
        |args| {
            let basic = args.text("basic_prompt");
            let image_type = args.text("image_type");
            let enhanced = enhanced_prompt(basic, image_type);
            let tips: String = PROMPT_TIPS.iter().map(|tip| format!("\n- {tip}")).collect();
            let text =
                format!("Original: {basic}\nEnhanced: {enhanced}\nType: {image_type}\nTips:{tips}");
            let mut details = Map::new();
            details.insert("original".to_string(), Value::from(basic));
            details.insert("enhanced".to_string(), Value::from(enhanced));
            details.insert("type".to_string(), Value::from(image_type));
            details.insert("tips".to_string(), json!(PROMPT_TIPS));
            Ok(ToolPlan::Report { text, details })
        },
    );

    registry
}

pub fn style_suffix(style: &str) -> &'static str {
    match style {
        "artistic" => "digital art, artistic style, creative",
        "cartoon" => "cartoon style, colorful, playful",
        "sketch" => "pencil sketch, black and white, artistic",
        _ => "photorealistic, high quality, detailed",
    }
}

pub fn styled_prompt(prompt: &str, style: &str) -> String {
    format!("{prompt}, {}", style_suffix(style))
}

pub fn banner_prompt(business_type: &str, color_theme: &str, style: &str) -> String {
    match style {
        "minimal" => format!(
            "minimal website banner, {business_type} business, {color_theme} accent, simple layout, elegant"
        ),
        "corporate" => format!(
            "corporate website banner, {business_type} industry, {color_theme} professional colors, business style"
        ),
        "creative" => format!(
            "creative website banner, {business_type} company, {color_theme} vibrant colors, artistic design"
        ),
        _ => format!(
            "modern website banner for {business_type} company, {color_theme} color scheme, clean design, professional, minimalist"
        ),
    }
}

pub fn enhanced_prompt(basic_prompt: &str, image_type: &str) -> String {
    let rule = match image_type {
        "illustration" => "digital illustration, artistic, clean design, professional",
        "logo" => "logo design, simple, clean, vector style, scalable",
        "banner" => "web banner, modern design, professional, clean layout",
        _ => "photorealistic, high quality, professional photography, detailed",
    };
    format!("{basic_prompt}, {rule}, trending on artstation")
}

fn focus_instruction(focus: &str) -> &'static str {
    match focus {
        "performance" => "Focus on performance optimization and efficiency.",
        "security" => "Focus on security vulnerabilities and safe coding practices.",
        "readability" => "Focus on readability and maintainability.",
        "best-practices" => "Focus on language-specific best practices and conventions.",
        _ => "Give comprehensive feedback covering performance, security, readability, and best practices.",
    }
}

fn conversation_prompt(args: &ToolArguments) -> Prompt {
    let message = args.text("message");
    let text = match args.optional_text("context") {
        Some(context) => format!(
            "Context: {context}\n\nUser: {message}\n\nPlease give a professional and helpful answer."
        ),
        None => message.to_string(),
    };
    Prompt::new(text, SMART_CONVERSATION_BUDGET)
}

fn code_review_prompt(args: &ToolArguments) -> Prompt {
    let language = args.text("language");
    let text = format!(
        "Please review the following {language} code and provide detailed feedback.\n\n\
         {focus}\n\n\
         Code to review:\n```{language}\n{code}\n```\n\n\
         Please provide:\n\
         1. Overall assessment\n\
         2. Specific issues found\n\
         3. Improvement suggestions\n\
         4. Refactoring suggestions (if needed)\n\
         5. Best-practice guidance",
        focus = focus_instruction(args.text("focus")),
        code = args.text("code"),
    );
    Prompt::new(text, CODE_REVIEW_BUDGET)
}

fn readme_prompt(args: &ToolArguments) -> Prompt {
    let mut text = format!(
        "Generate a professional README.md for the following project:\n\nProject description: {}\n",
        args.text("project_info")
    );
    if let Some(tech_stack) = args.optional_text("tech_stack") {
        text.push_str(&format!("Tech stack: {tech_stack}\n"));
    }
    let features = args.list("features");
    if !features.is_empty() {
        text.push_str(&format!("Key features: {}\n", features.join(", ")));
    }
    text.push_str(
        "\nInclude:\n\
         1. Project title and description\n\
         2. Feature list\n\
         3. Tech stack\n\
         4. Installation instructions\n\
         5. Usage examples\n\
         6. Contribution guidelines\n\
         7. License information\n\n\
         Use proper Markdown formatting.",
    );
    Prompt::new(text, README_GENERATION_BUDGET)
}

fn ui_feedback_prompt(args: &ToolArguments) -> Prompt {
    let mut text = format!(
        "Analyze this UI design and suggest improvements:\n\nUI description: {}\nTarget users: {}\n",
        args.text("ui_description"),
        args.text("target_users")
    );
    if let Some(goals) = args.optional_text("design_goals") {
        text.push_str(&format!("Design goals: {goals}\n"));
    }
    text.push_str(
        "\nCover:\n\
         1. User experience (UX)\n\
         2. Visual design\n\
         3. Accessibility\n\
         4. Responsive design\n\
         5. Conversion optimization\n\
         6. Modern design trends\n\n\
         Give specific, actionable suggestions.",
    );
    Prompt::new(text, UI_FEEDBACK_BUDGET)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn plan(tool: &str, arguments: Value) -> ToolPlan {
        let registry = builtin_registry();
        let tool = registry.get(tool).expect("builtin tool should exist");
        let args = tool
            .schema()
            .validate(&arguments)
            .expect("arguments should validate");
        tool.plan(&args).expect("plan should build")
    }

    fn text_prompt(plan: ToolPlan) -> Prompt {
        match plan {
            ToolPlan::Text(prompt) => prompt,
            other => panic!("expected text plan, got {other:?}"),
        }
    }

    #[test]
    fn code_review_prompt_embeds_code_and_language() {
        let prompt = text_prompt(plan(
            CODE_REVIEW,
            json!({"code": "let x=1", "language": "JavaScript"}),
        ));

        assert!(prompt.text.contains("let x=1"));
        assert!(prompt.text.contains("JavaScript"));
        assert!(prompt.text.contains("comprehensive feedback"));
        assert_eq!(prompt.token_budget, CODE_REVIEW_BUDGET);
    }

    #[test]
    fn code_review_defaults_language_label() {
        let prompt = text_prompt(plan(CODE_REVIEW, json!({"code": "print(1)"})));

        assert!(prompt.text.contains("following JavaScript code"));
    }

    #[test]
    fn code_review_focus_selects_instruction() {
        let prompt = text_prompt(plan(
            CODE_REVIEW,
            json!({"code": "x", "language": "Rust", "focus": "security"}),
        ));

        assert!(prompt.text.contains("security vulnerabilities"));
        assert!(prompt.text.contains("```Rust\nx\n```"));
    }

    #[test]
    fn conversation_includes_context_only_when_present() {
        let bare = text_prompt(plan(SMART_CONVERSATION, json!({"message": "Hi"})));
        assert_eq!(bare.text, "Hi");
        assert_eq!(bare.token_budget, SMART_CONVERSATION_BUDGET);

        let with_context = text_prompt(plan(
            SMART_CONVERSATION,
            json!({"message": "Hi", "context": "greeting"}),
        ));
        assert!(with_context.text.starts_with("Context: greeting"));
    }

    #[test]
    fn readme_prompt_lists_features() {
        let prompt = text_prompt(plan(
            README_GENERATION,
            json!({"project_info": "CLI tool", "features": ["fast", "small"]}),
        ));

        assert!(prompt.text.contains("Key features: fast, small"));
        assert!(!prompt.text.contains("Tech stack: "));
        assert_eq!(prompt.token_budget, README_GENERATION_BUDGET);
    }

    #[test]
    fn ui_feedback_defaults_target_users() {
        let prompt = text_prompt(plan(UI_FEEDBACK, json!({"ui_description": "Login page"})));

        assert!(prompt.text.contains("Target users: general users"));
    }

    #[test]
    fn generate_image_applies_style_suffix() {
        let plan = plan(
            GENERATE_IMAGE,
            json!({"prompt": "a red fox", "style": "sketch", "save_locally": false}),
        );

        assert_eq!(
            plan,
            ToolPlan::Image(ImagePlan {
                prompt: "a red fox, pencil sketch, black and white, artistic".to_string(),
                style: "sketch".to_string(),
                save: false,
            })
        );
    }

    #[test]
    fn banner_uses_realistic_suffix_and_always_saves() {
        let ToolPlan::Image(image) = plan(
            GENERATE_WEBSITE_BANNER,
            json!({"business_type": "bakery", "style": "creative"}),
        ) else {
            panic!("banner should plan an image");
        };

        assert!(image.prompt.starts_with("creative website banner, bakery company, blue"));
        assert!(image.prompt.ends_with(style_suffix("realistic")));
        assert!(image.save);
    }

    #[test]
    fn enhance_prompt_is_local() {
        let ToolPlan::Report { text, details } = plan(
            ENHANCE_PROMPT,
            json!({"basic_prompt": "a cat", "image_type": "logo"}),
        ) else {
            panic!("enhance_prompt should answer locally");
        };

        let enhanced =
            "a cat, logo design, simple, clean, vector style, scalable, trending on artstation";
        assert!(text.contains(enhanced));
        assert_eq!(details["original"], "a cat");
        assert_eq!(details["enhanced"], enhanced);
        assert_eq!(details["type"], "logo");
        assert_eq!(details["tips"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn every_tool_handles_required_arguments_only() {
        let registry = builtin_registry();
        for definition in registry.definitions() {
            let required = definition.input_schema["required"]
                .as_array()
                .cloned()
                .unwrap_or_default();
            let arguments: serde_json::Map<String, Value> = required
                .iter()
                .filter_map(Value::as_str)
                .map(|name| (name.to_string(), json!("sample")))
                .collect();

            let tool = registry
                .get(&definition.name)
                .expect("listed tool should resolve");
            let args = tool
                .schema()
                .validate(&Value::Object(arguments))
                .expect("required arguments should validate");
            assert!(tool.plan(&args).is_ok(), "{} should plan", definition.name);
        }
    }
}
