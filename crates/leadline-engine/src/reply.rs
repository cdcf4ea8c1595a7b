//! Reply copy and lead-log labels.
//!
//! All user-facing text lives here, WhatsApp `*bold*` markup included, so
//! the engine stays free of copy edits. The label strings double as the
//! `choice` column of the lead log and must stay stable for reporting.

/// Detail text and lead-log label for one menu option.
#[derive(Debug, Clone, Copy)]
pub struct MenuOption {
    pub text: &'static str,
    pub label: &'static str,
}

/// The five-option main menu.
pub fn main_menu() -> &'static str {
    concat!(
        "🔥 *Welcome to Your Business!*\n\n",
        "Please choose an option:\n\n",
        "1️⃣ *Product Catalog*\n",
        "2️⃣ *Pricing & Plans*\n",
        "3️⃣ *Schedule Demo*\n",
        "4️⃣ *Contact Support*\n",
        "5️⃣ *Download Brochure*\n\n",
        "💬 Reply with number (1-5) or type *menu* anytime"
    )
}

/// Detail reply for a selected menu option, `None` outside 1..=5.
pub fn menu_option(choice: u8) -> Option<MenuOption> {
    match choice {
        1 => Some(MenuOption {
            text: concat!(
                "📦 *Product Catalog*\n\n",
                "Our top products:\n",
                "• Premium Service A - ₹2999\n",
                "• Standard Service B - ₹1499\n",
                "• Basic Service C - ₹999\n\n",
                "Want detailed specs? Reply *specs*\n",
                "Ready to buy? Reply *buy*\n",
                "Or type *menu* to go back"
            ),
            label: "Product Catalog Requested",
        }),
        2 => Some(MenuOption {
            text: concat!(
                "💰 *Pricing & Plans*\n\n",
                "🌟 *Starter* - ₹999/month\n",
                "• Feature 1, 2, 3\n\n",
                "🚀 *Pro* - ₹2999/month\n",
                "• All Starter + Premium features\n\n",
                "🔥 *Enterprise* - Custom pricing\n",
                "• Full suite + support\n\n",
                "Ready to start? Reply *buy*\n",
                "Or type *menu* to go back"
            ),
            label: "Pricing Requested",
        }),
        3 => Some(MenuOption {
            text: concat!(
                "📅 *Schedule Demo*\n\n",
                "Great choice! To book your demo:\n\n",
                "Share your preferred:\n",
                "• Date (DD-MM-YYYY)\n",
                "• Time (HH:MM)\n",
                "• Your name\n\n",
                "Example: \"25-09-2025 15:00 John\"\n\n",
                "Or type *menu* to go back"
            ),
            label: "Demo Requested",
        }),
        4 => Some(MenuOption {
            text: concat!(
                "🎧 *Contact Support*\n\n",
                "Our team is here to help!\n\n",
                "📞 Call: +91-XXXXX-XXXXX\n",
                "📧 Email: support@yourcompany.com\n",
                "⏰ Hours: 9 AM - 6 PM (Mon-Sat)\n\n",
                "For urgent issues, reply *urgent*\n",
                "Or type *menu* to go back"
            ),
            label: "Support Requested",
        }),
        5 => Some(MenuOption {
            text: concat!(
                "📄 *Download Brochure*\n\n",
                "Here's our company brochure with all details!\n\n",
                "[PDF would be attached here]\n\n",
                "Need more info? Reply *call* for callback\n",
                "Want to buy? Reply *buy*\n",
                "Or type *menu* for more options"
            ),
            label: "Brochure Downloaded",
        }),
        _ => None,
    }
}

pub fn purchase() -> &'static str {
    concat!(
        "💳 *Ready to Purchase?*\n\n",
        "WhatsApp us your requirements:\n",
        "+91-XXXXX-XXXXX\n\n",
        "Or visit: www.yourwebsite.com\n\n",
        "After order, we'll send payment link!"
    )
}

pub fn urgent(phone: &str) -> String {
    format!(
        "🚨 *Urgent Support*\n\nConnecting you to our priority team...\nYou'll receive a call within 15 minutes.\n\nCallback number: {phone}"
    )
}

pub fn callback(phone: &str) -> String {
    format!(
        "📞 *Callback Requested*\n\nWe'll call you within 2 hours!\nPhone: {phone}\n\nFor faster response, WhatsApp us directly."
    )
}

pub fn greeting(name: &str) -> String {
    format!("Nice to meet you, *{name}*! 👋\n\nHow can I help you today? Type *menu* for options.")
}

pub fn demo_confirmation(date: &str, time: &str, name: Option<&str>) -> String {
    let name = name.unwrap_or("Not provided");
    format!(
        "✅ *Demo Scheduled!*\n\n📅 Date: {date}\n⏰ Time: {time}\n👤 Name: {name}\n\nWe'll call you 10 mins before the demo.\nCalendar invite will be sent shortly!"
    )
}

pub fn fallback() -> &'static str {
    concat!(
        "🤔 I didn't quite understand that.\n\n",
        "Type *menu* to see options\n",
        "Type *support* for help\n",
        "Or just tell me what you need!"
    )
}

pub fn invalid_choice() -> &'static str {
    "❌ Invalid choice. Please reply 1-5 or type *menu*"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_five_options_have_copy() {
        for choice in 1..=5 {
            assert!(menu_option(choice).is_some(), "option {choice} missing");
        }
        assert!(menu_option(0).is_none());
        assert!(menu_option(6).is_none());
    }

    #[test]
    fn option_labels_match_reporting_contract() {
        let labels: Vec<&str> = (1..=5)
            .filter_map(|c| menu_option(c).map(|o| o.label))
            .collect();
        assert_eq!(
            labels,
            vec![
                "Product Catalog Requested",
                "Pricing Requested",
                "Demo Requested",
                "Support Requested",
                "Brochure Downloaded",
            ]
        );
    }

    #[test]
    fn demo_confirmation_defaults_missing_name() {
        let text = demo_confirmation("25-09-2025", "15:00", None);
        assert!(text.contains("👤 Name: Not provided"));
        let text = demo_confirmation("25-09-2025", "15:00", Some("John"));
        assert!(text.contains("👤 Name: John"));
    }
}
