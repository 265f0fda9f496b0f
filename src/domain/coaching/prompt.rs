//! System prompt composition for the fitness coach.
//!
//! The prompt pins the reply language, forbids markdown-style layout, and
//! shows the model the exact chat-friendly shape it must answer in. The
//! output is a pure function of the profile and language.

use super::language::LanguageTag;
use super::profile::{render, UserProfile};

/// Builds the coach's system instruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Composes the system prompt for one coaching request.
    pub fn compose(&self, profile: &UserProfile, language: LanguageTag) -> String {
        let mut prompt = String::with_capacity(2048);

        prompt.push_str(COACH_ROLE);
        prompt.push_str("\n\n");
        prompt.push_str(&profile_section(profile));
        prompt.push_str("\n\n");
        prompt.push_str(&language_section(language));
        prompt.push_str("\n\n");
        prompt.push_str(FORMAT_PROHIBITIONS);
        prompt.push_str("\n\n");
        prompt.push_str(REQUIRED_STYLE);
        prompt.push_str("\n\n");
        prompt.push_str(EXAMPLE_REPLY);
        prompt.push_str("\n\n");
        prompt.push_str(CLOSING_RULES);
        prompt.push('\n');

        prompt
    }
}

fn profile_section(profile: &UserProfile) -> String {
    format!(
        "User Profile:\n\
         Age: {age}\n\
         Gender: {gender}\n\
         Height: {height} cm\n\
         Weight: {weight} kg\n\
         Goal: {goal}\n\
         Activity Level: {activity}\n\
         Diet Type: {diet}\n\
         Medical Conditions:\n\
         {conditions}",
        age = render(&profile.age),
        gender = render(&profile.gender),
        height = render(&profile.height_cm),
        weight = render(&profile.weight_kg),
        goal = render(&profile.goal),
        activity = render(&profile.activity_level),
        diet = render(&profile.diet_type),
        conditions = profile.medical_conditions_text(),
    )
}

fn language_section(language: LanguageTag) -> String {
    format!(
        "CRITICAL OUTPUT RULES (MANDATORY):\n\
         You MUST follow these rules exactly.\n\
         \n\
         LANGUAGE RULE (ABSOLUTE):\n\
         You MUST reply ONLY in this language: {code}.\n\
         {native}\n\
         {rules}",
        code = language.directive_code(),
        native = native_instruction(language),
        rules = language_rules(language),
    )
}

/// The language directive restated in the reply language itself.
pub fn native_instruction(language: LanguageTag) -> &'static str {
    match language {
        LanguageTag::En => "Reply only in clear, friendly English.",
        LanguageTag::Ta => {
            "பதில் முழுவதும் தமிழில் மட்டும் எழுதுங்கள். எளிமையாகவும் நட்பாகவும் எழுதுங்கள்."
        }
        LanguageTag::Hi => "केवल हिंदी में उत्तर दें। सरल और दोस्ताना भाषा का उपयोग करें।",
    }
}

fn language_rules(language: LanguageTag) -> &'static str {
    match language {
        LanguageTag::En => "Use ONLY English words.\nDo NOT include Hindi or Tamil words.",
        LanguageTag::Hi => {
            "Use ONLY Hindi (Devanagari or natural Hinglish).\n\
             Do NOT include English sentences.\n\
             Do NOT include Tamil words."
        }
        LanguageTag::Ta => {
            "Use ONLY Tamil (Tamil script or natural Thanglish).\n\
             Do NOT include English sentences.\n\
             Do NOT include Hindi words."
        }
    }
}

const COACH_ROLE: &str = "You are an expert AI Fitness Coach inside a premium fitness app.";

const FORMAT_PROHIBITIONS: &str = "❌ NEVER use:
Markdown of any kind
Headings made with hash signs
Bold or italic markers made with asterisks
Lines that start with a dash or an asterisk
Bullet points
Numbered lists
Long paragraphs";

const REQUIRED_STYLE: &str = "✅ ALWAYS use this style ONLY:

Emoji + Short Title
One short sentence per line
A blank line between sections
Friendly and motivating tone";

const EXAMPLE_REPLY: &str = "Example format you MUST follow:

💪 Today's Focus
Full body strength with joint safety

🔥 Warm Up
5 minutes of light walking
Gentle arm circles
Neck mobility movements

🏋️ Strength
Bodyweight squats if pain-free
Wall push-ups
Core engagement exercises

🧘 Recovery
Stretch gently
Ice knee if needed
Rest is progress

⚠️ Safety Notes
Stop if pain increases
Avoid high impact";

const CLOSING_RULES: &str = "DO NOT explain the rules.
DO NOT apologize.
DO NOT mention formatting.

Your job is to respond ONLY in this visual chat-friendly format.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coaching::profile::ProfileValue;

    fn sample_profile() -> UserProfile {
        UserProfile {
            age: Some(ProfileValue::Number(29.0)),
            gender: Some("female".into()),
            height_cm: Some(ProfileValue::Number(165.0)),
            weight_kg: Some(ProfileValue::Number(61.5)),
            goal: Some("muscle gain".into()),
            activity_level: Some("moderate".into()),
            diet_type: Some("vegetarian".into()),
            medical_conditions: Some(vec!["asthma", "knee pain"].into()),
        }
    }

    #[test]
    fn embeds_profile_fields_verbatim() {
        let prompt = PromptComposer::new().compose(&sample_profile(), LanguageTag::En);

        assert!(prompt.contains("Age: 29\n"));
        assert!(prompt.contains("Gender: female\n"));
        assert!(prompt.contains("Height: 165 cm\n"));
        assert!(prompt.contains("Weight: 61.5 kg\n"));
        assert!(prompt.contains("Goal: muscle gain\n"));
        assert!(prompt.contains("Activity Level: moderate\n"));
        assert!(prompt.contains("Diet Type: vegetarian\n"));
        assert!(prompt.contains("Medical Conditions:\nasthma, knee pain\n"));
    }

    #[test]
    fn empty_conditions_render_none_sentinel() {
        let profile = UserProfile {
            medical_conditions: Some(ProfileValue::List(vec![])),
            ..sample_profile()
        };
        let prompt = PromptComposer::new().compose(&profile, LanguageTag::En);
        assert!(prompt.contains("Medical Conditions:\nNone\n"));
    }

    #[test]
    fn missing_fields_render_empty() {
        let prompt = PromptComposer::new().compose(&UserProfile::default(), LanguageTag::En);
        assert!(prompt.contains("Age: \n"));
        assert!(prompt.contains("Height:  cm\n"));
        assert!(prompt.contains("Medical Conditions:\nNone\n"));
    }

    #[test]
    fn directive_names_only_the_resolved_language() {
        let composer = PromptComposer::new();
        for language in LanguageTag::ALL {
            let prompt = composer.compose(&sample_profile(), language);
            let directive = format!("reply ONLY in this language: {}.", language.directive_code());
            assert!(prompt.contains(&directive), "missing directive for {}", language);

            for other in LanguageTag::ALL.iter().filter(|l| **l != language) {
                let foreign = format!("this language: {}", other.directive_code());
                assert!(!prompt.contains(&foreign), "{} prompt names {}", language, other);
                assert!(!prompt.contains(&format!("If language is {}", other.directive_code())));
            }
            assert!(prompt.contains(native_instruction(language)));
        }
    }

    #[test]
    fn forbidden_list_markers_are_not_used() {
        let prompt = PromptComposer::new().compose(&sample_profile(), LanguageTag::Hi);

        assert!(!prompt.contains("**"));
        assert!(!prompt.contains("###"));
        for line in prompt.lines() {
            let trimmed = line.trim_start();
            assert!(!trimmed.starts_with("- "), "bullet line: {}", line);
            assert!(!trimmed.starts_with("* "), "bullet line: {}", line);
            let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
            assert!(
                digits.is_empty() || !trimmed[digits.len()..].starts_with('.'),
                "numbered line: {}",
                line
            );
        }
    }

    #[test]
    fn includes_style_example_and_closing_rules() {
        let prompt = PromptComposer::new().compose(&sample_profile(), LanguageTag::Ta);

        assert!(prompt.contains("💪 Today's Focus\nFull body strength with joint safety\n\n🔥 Warm Up"));
        assert!(prompt.contains("One short sentence per line"));
        assert!(prompt.contains("DO NOT explain the rules."));
        assert!(prompt.trim_end().ends_with("visual chat-friendly format."));
    }

    #[test]
    fn composition_is_deterministic() {
        let composer = PromptComposer::new();
        let a = composer.compose(&sample_profile(), LanguageTag::Hi);
        let b = composer.compose(&sample_profile(), LanguageTag::Hi);
        assert_eq!(a, b);
    }
}
