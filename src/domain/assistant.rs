// Offline assistant replies, used when no chat relay answers
use super::glucose::MgDl;
use super::summary::GlucoseStatus;

/// What the assistant knows about the user when answering without a relay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantContext {
    pub current: Option<MgDl>,
    pub average: Option<MgDl>,
    pub medications: usize,
    pub foods: usize,
    pub readings: usize,
}

pub fn greeting(user_name: &str) -> String {
    format!(
        "Hello {}! I'm your AI glucose assistant. I can help you understand your readings, \
         analyze your food photos, review your medications, and provide personalized advice.",
        user_name
    )
}

/// The display name is the local part of an e-mail style user id.
pub fn display_name(user_id: &str) -> &str {
    user_id.split('@').next().unwrap_or(user_id)
}

pub fn offline_reply(prompt: &str, ctx: &AssistantContext) -> String {
    let lower = prompt.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if mentions(&["glucose", "sugar", "level"]) {
        match (ctx.current, ctx.average) {
            (Some(current), Some(average)) => {
                let advice = match GlucoseStatus::classify(current) {
                    GlucoseStatus::High => {
                        "This is slightly elevated. Consider light exercise and staying hydrated."
                    }
                    GlucoseStatus::Low => {
                        "This is low. Please consume 15g of fast-acting carbs immediately."
                    }
                    GlucoseStatus::Normal => "This is within normal range!",
                };
                format!(
                    "Your current glucose level is {} mg/dL. Your 24-hour average is {} mg/dL. {}",
                    current, average, advice
                )
            }
            _ => "I don't have any glucose readings for today yet. Upload your device data \
                  in the Data Upload tab and I'll take a look."
                .to_string(),
        }
    } else if mentions(&["food", "meal"]) {
        format!(
            "You have {} food photos logged. I can analyze your meals to help you make better \
             choices. Would you like me to review your recent meals?",
            ctx.foods
        )
    } else if mentions(&["medication", "medicine"]) {
        format!(
            "You have {} medications recorded. Remember to take them as prescribed. \
             Would you like me to set up reminders?",
            ctx.medications
        )
    } else if mentions(&["data", "export"]) {
        if ctx.readings > 0 {
            format!(
                "I can see your uploaded data with {} records. Would you like me to analyze patterns?",
                ctx.readings
            )
        } else {
            "You can upload your device data in the Data Upload tab for detailed analysis."
                .to_string()
        }
    } else {
        let reading = ctx
            .current
            .map(|c| format!(" Your current reading is {} mg/dL.", c))
            .unwrap_or_default();
        format!(
            "I can help with glucose monitoring, food analysis, medication tracking, and data \
             insights.{} What would you like to know?",
            reading
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AssistantContext {
        AssistantContext {
            current: Some(150),
            average: Some(120),
            medications: 2,
            foods: 3,
            readings: 288,
        }
    }

    #[test]
    fn test_glucose_reply_quotes_reading() {
        let reply = offline_reply("What is my SUGAR like?", &ctx());
        assert!(reply.contains("150 mg/dL"));
        assert!(reply.contains("120 mg/dL"));
        assert!(reply.contains("slightly elevated"));
    }

    #[test]
    fn test_glucose_reply_without_data() {
        let reply = offline_reply("glucose?", &AssistantContext::default());
        assert!(reply.contains("don't have any glucose readings"));
    }

    #[test]
    fn test_keyword_routing() {
        assert!(offline_reply("review my meal", &ctx()).contains("3 food photos"));
        assert!(offline_reply("my medicine", &ctx()).contains("2 medications"));
        assert!(offline_reply("export", &ctx()).contains("288 records"));
        assert!(offline_reply("export", &AssistantContext::default()).contains("Data Upload tab"));
        assert!(offline_reply("hi", &ctx()).contains("current reading is 150"));
        assert!(!offline_reply("hi", &AssistantContext::default()).contains("current reading"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("jane@example.com"), "jane");
        assert_eq!(display_name("demo-user"), "demo-user");
        assert!(greeting("jane").starts_with("Hello jane!"));
    }
}
