//! Prompt construction for curation and content generation.

use matchwire_common::sport::display_name;
use matchwire_common::types::ContentType;

/// Raw field values are capped before interpolation to stay inside the
/// model's context window.
const PROMPT_FIELD_CAP: usize = 12_000;

/// Which curation prompt is active. The parse step must look for exactly
/// the labels the prompt asked for, so the variant owns both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVariant {
    /// Curate title + card description from title + summary.
    TwoField,
    /// Curate title + card description + detail summary from
    /// title + summary + content. The current contract.
    #[default]
    ThreeField,
}

impl PromptVariant {
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            PromptVariant::TwoField => &["TITLE", "DESCRIPTION"],
            PromptVariant::ThreeField => &["TITLE", "DESCRIPTION", "SUMMARY"],
        }
    }

    /// Does this variant require the staged `content` field?
    pub fn needs_content(&self) -> bool {
        matches!(self, PromptVariant::ThreeField)
    }
}

/// Build the curation instruction prompt for one staged article.
/// `content` is ignored by the two-field variant.
pub fn curation_prompt(
    variant: PromptVariant,
    title: &str,
    summary: &str,
    content: Option<&str>,
) -> String {
    let title = cap(title);
    let summary = cap(summary);

    match variant {
        PromptVariant::TwoField => format!(
            "Curate this sports news article for better mobile UI display:\n\
             \n\
             Title: {title}\n\
             Description (for cards): {summary}\n\
             \n\
             Please provide:\n\
             1. A compelling, SEO-friendly title (50 characters or less)\n\
             2. A concise description that hooks readers (max 120 chars, 2 lines for cards)\n\
             \n\
             The description should be punchy and engaging for news cards.\n\
             It should end with proper punctuation and avoid unnecessary words.\n\
             \n\
             Format your response as:\n\
             TITLE: [your curated title]\n\
             DESCRIPTION: [your curated description]"
        ),
        PromptVariant::ThreeField => {
            let content = cap(content.unwrap_or_default());
            format!(
                "Curate this sports news article for better mobile UI display:\n\
                 \n\
                 Title: {title}\n\
                 Description (for cards): {summary}\n\
                 Summary (for detail page): {content}\n\
                 \n\
                 Please provide:\n\
                 1. A compelling, SEO-friendly title (50 characters or less)\n\
                 2. A concise description that hooks readers (max 120 chars, 2 lines for cards)\n\
                 3. An engaging summary for the detail page (max 300 chars, mobile-friendly)\n\
                 \n\
                 The description should be punchy and engaging for news cards.\n\
                 The summary should be informative but concise for the detail page.\n\
                 Both should end with proper punctuation and avoid unnecessary words.\n\
                 \n\
                 Format your response as:\n\
                 TITLE: [your curated title]\n\
                 DESCRIPTION: [your curated description]\n\
                 SUMMARY: [your curated summary]"
            )
        }
    }
}

/// System prompt for the content-generation pipeline.
pub const GENERATION_SYSTEM_PROMPT: &str = "You are a sports content generator for a family sports app. \
     You produce accurate, age-appropriate content. \
     Respond with valid JSON only: no prose, no markdown fences.";

/// Build the type-specific generation instruction.
pub fn generation_prompt(
    content_type: ContentType,
    sport: &str,
    quantity: u32,
    difficulty: &str,
    age_group: Option<&str>,
    reference_facts: &[String],
) -> String {
    let sport_label = display_name(sport);
    let audience = age_group
        .map(|age| format!(" Aim the content at the {age} age group."))
        .unwrap_or_default();

    let mut prompt = match content_type {
        ContentType::BulkTrivia => format!(
            "Generate {quantity} {difficulty} trivia questions about {sport_label}.{audience}\n\
             Return a JSON array. Each element must be an object with keys:\n\
             \"question\" (string), \"options\" (array of 4 strings), \
             \"correct_answer\" (string, one of the options), \"explanation\" (string)."
        ),
        ContentType::SingleParentTip => format!(
            "Generate one practical tip for parents of young {sport_label} players \
             ({difficulty} level).{audience}\n\
             Return a single JSON object with keys:\n\
             \"title\" (string), \"benefits\" (array of strings), \
             \"content\" (string), \"age_group\" (string)."
        ),
        ContentType::SportFacts => format!(
            "Generate {quantity} surprising did-you-know facts about {sport_label} \
             ({difficulty} level).{audience}\n\
             Return a JSON array. Each element must be an object with keys:\n\
             \"fact\" (string), \"details\" (string), \"category\" (string)."
        ),
        ContentType::MixedContent | ContentType::General => format!(
            "Generate {quantity} mixed content items about {sport_label} \
             ({difficulty} level): a blend of trivia questions, parent tips, and \
             did-you-know facts.{audience}\n\
             Return a JSON array. Each element must be an object with a \"type\" key \
             (one of \"trivia\", \"parent_tip\", \"did_you_know\") and the fields for \
             that type:\n\
             trivia: \"question\", \"options\" (4 strings), \"correct_answer\", \"explanation\";\n\
             parent_tip: \"title\", \"benefits\" (array), \"content\", \"age_group\";\n\
             did_you_know: \"fact\", \"details\", \"category\"."
        ),
    };

    if !reference_facts.is_empty() {
        prompt.push_str("\n\nGround the content in these reference facts where relevant:\n");
        for fact in reference_facts {
            prompt.push_str("- ");
            prompt.push_str(fact);
            prompt.push('\n');
        }
    }

    prompt
}

fn cap(s: &str) -> &str {
    if s.len() <= PROMPT_FIELD_CAP {
        return s;
    }
    let mut end = PROMPT_FIELD_CAP;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
