use crate::capture::{DemoBooking, DemoParser, NameParser};
use leadline_core::LeadlineResult;
use leadline_session::{ConversationStep, SessionState};

/// Exact-match trigger words that restart the menu flow from any step.
const MENU_TRIGGERS: [&str; 6] = ["hi", "hello", "start", "menu", "help", "options"];

/// The classified meaning of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Serve (or re-serve) the main menu.
    GreetOrMenu,
    /// A numeric selection made while the menu was open.
    MenuChoice(u8),
    /// The sender wants to buy.
    PurchaseInterest,
    /// The sender needs immediate help.
    UrgentSupport,
    /// The sender asked to be called back.
    CallbackRequest,
    /// The sender introduced themselves.
    NameIntroduction(String),
    /// The sender supplied a demo-booking line.
    DemoScheduled(DemoBooking),
    /// Nothing matched.
    Unrecognized,
}

/// One message as seen by the rules: trimmed raw text, its lowercase form
/// and the sender's current step.
struct RuleInput<'a> {
    raw: &'a str,
    norm: &'a str,
    step: ConversationStep,
}

type Rule = fn(&IntentResolver, &RuleInput<'_>) -> Option<Intent>;

/// The precedence contract: evaluated top to bottom, first match wins.
const RULES: &[Rule] = &[
    IntentResolver::menu_trigger,
    IntentResolver::menu_choice,
    IntentResolver::purchase,
    IntentResolver::urgent,
    IntentResolver::callback,
    IntentResolver::name_introduction,
    IntentResolver::demo_booking,
    IntentResolver::first_contact_default,
];

/// Deterministic, side-effect-free intent classification.
///
/// Keyword rules run against the lowercased text; the two capture rules
/// hand the raw text to their parser so captured values keep the sender's
/// casing.
pub struct IntentResolver {
    names: NameParser,
    demos: DemoParser,
}

impl IntentResolver {
    pub fn new() -> LeadlineResult<Self> {
        Ok(Self {
            names: NameParser::new()?,
            demos: DemoParser::new()?,
        })
    }

    /// Classify one inbound message against the sender's session.
    ///
    /// Total: every input maps to an intent, with [`Intent::Unrecognized`]
    /// as the floor.
    pub fn resolve(&self, raw_text: &str, session: &SessionState) -> Intent {
        let raw = raw_text.trim();
        let norm = raw.to_lowercase();
        let input = RuleInput {
            raw,
            norm: &norm,
            step: session.step,
        };

        RULES
            .iter()
            .find_map(|rule| rule(self, &input))
            .unwrap_or(Intent::Unrecognized)
    }

    // ── Rules, in precedence order ───────────────────────────────────────

    fn menu_trigger(&self, input: &RuleInput<'_>) -> Option<Intent> {
        MENU_TRIGGERS
            .contains(&input.norm)
            .then_some(Intent::GreetOrMenu)
    }

    fn menu_choice(&self, input: &RuleInput<'_>) -> Option<Intent> {
        if input.step != ConversationStep::MenuSent {
            return None;
        }
        let choice = match input.norm {
            "1" => 1,
            "2" => 2,
            "3" => 3,
            "4" => 4,
            "5" => 5,
            _ => return None,
        };
        Some(Intent::MenuChoice(choice))
    }

    fn purchase(&self, input: &RuleInput<'_>) -> Option<Intent> {
        matches!(input.norm, "buy" | "purchase").then_some(Intent::PurchaseInterest)
    }

    fn urgent(&self, input: &RuleInput<'_>) -> Option<Intent> {
        matches!(input.norm, "urgent" | "emergency").then_some(Intent::UrgentSupport)
    }

    fn callback(&self, input: &RuleInput<'_>) -> Option<Intent> {
        input.norm.contains("call").then_some(Intent::CallbackRequest)
    }

    fn name_introduction(&self, input: &RuleInput<'_>) -> Option<Intent> {
        if !input.norm.contains("my name is") && !input.norm.contains("i am") {
            return None;
        }
        self.names.parse(input.raw).map(Intent::NameIntroduction)
    }

    fn demo_booking(&self, input: &RuleInput<'_>) -> Option<Intent> {
        if !input.norm.contains('-') || !input.norm.contains(':') {
            return None;
        }
        self.demos.parse(input.raw).map(Intent::DemoScheduled)
    }

    fn first_contact_default(&self, input: &RuleInput<'_>) -> Option<Intent> {
        (input.step == ConversationStep::New).then_some(Intent::GreetOrMenu)
    }
}
