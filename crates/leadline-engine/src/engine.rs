use crate::intent::{Intent, IntentResolver};
use crate::reply;
use chrono::{DateTime, Utc};
use leadline_channels::Channel;
use leadline_core::{display_phone, LeadlineError, LeadlineResult, LogEvent, StatusTag};
use leadline_session::{ConversationStep, SessionState, SessionStore};
use leadline_sink::EventSink;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one handled message.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Text delivered back to the sender.
    pub reply: String,
    /// Successor session state, already stamped with the activity time.
    pub next: SessionState,
    /// Lead-log event for this interaction. `None` only on the defensive
    /// invalid-choice branch, which logs nothing.
    pub event: Option<LogEvent>,
}

/// Drives one full message-handling turn against injected capabilities.
///
/// The engine owns no shared mutable state; per-sender serialization is the
/// dispatcher's job. Every capability call is bounded by `io_timeout`.
pub struct SessionEngine {
    store: Arc<dyn SessionStore>,
    channel: Arc<dyn Channel>,
    sink: Arc<dyn EventSink>,
    resolver: IntentResolver,
    io_timeout: Duration,
}

impl SessionEngine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        channel: Arc<dyn Channel>,
        sink: Arc<dyn EventSink>,
        io_timeout: Duration,
    ) -> LeadlineResult<Self> {
        Ok(Self {
            store,
            channel,
            sink,
            resolver: IntentResolver::new()?,
            io_timeout,
        })
    }

    /// Handle one inbound message end to end.
    ///
    /// Loads the sender's session, resolves the intent, runs the pure
    /// transition, then persists, replies and logs in that order. A store
    /// failure drops the message with an `Err`; delivery and lead-log
    /// failures are logged and tolerated, so the reply is at-most-once.
    pub async fn handle(&self, sender: &str, raw_text: &str) -> LeadlineResult<Turn> {
        let now = Utc::now();

        let session = self
            .bounded("session load", LeadlineError::Session, self.store.get(sender))
            .await?
            .unwrap_or_else(|| SessionState::new(now));

        let intent = self.resolver.resolve(raw_text, &session);
        info!(
            sender = %display_phone(sender),
            step = ?session.step,
            intent = ?intent,
            "Resolved inbound message"
        );

        let turn = transition(sender, raw_text, &session, intent, now);

        // Persist before replying: a crash between the two loses a reply,
        // never a state transition.
        self.bounded(
            "session save",
            LeadlineError::Session,
            self.store.put(sender, &turn.next),
        )
        .await?;

        if let Err(e) = self
            .bounded(
                "reply delivery",
                LeadlineError::Channel,
                self.channel.send(sender, &turn.reply),
            )
            .await
        {
            warn!(sender = %display_phone(sender), error = %e, "Reply delivery failed");
        }

        if let Some(event) = &turn.event {
            if let Err(e) = self
                .bounded("lead log", LeadlineError::Sink, self.sink.record(event))
                .await
            {
                warn!(sender = %display_phone(sender), error = %e, "Lead log append failed");
            }
        }

        Ok(turn)
    }

    async fn bounded<T, F>(
        &self,
        what: &str,
        wrap: fn(String) -> LeadlineError,
        fut: F,
    ) -> LeadlineResult<T>
    where
        F: Future<Output = LeadlineResult<T>>,
    {
        match tokio::time::timeout(self.io_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(wrap(format!(
                "{what} timed out after {:?}",
                self.io_timeout
            ))),
        }
    }
}

/// Pure step of the conversation state machine.
///
/// Maps one resolved intent to the reply text, the successor state and the
/// lead-log event. No I/O happens here; `now` is injected so the mapping is
/// fully deterministic.
pub fn transition(
    sender: &str,
    raw_text: &str,
    session: &SessionState,
    intent: Intent,
    now: DateTime<Utc>,
) -> Turn {
    match intent {
        Intent::GreetOrMenu => {
            let mut next = session.clone();
            next.step = ConversationStep::MenuSent;
            next.touch(now);
            Turn {
                reply: reply::main_menu().to_string(),
                event: Some(LogEvent::new(
                    sender,
                    session.display_name.clone(),
                    "Main Menu Sent",
                    "User received main menu",
                    StatusTag::Engaged,
                    now,
                )),
                next,
            }
        }

        Intent::MenuChoice(choice) => menu_choice_turn(sender, session, choice, now),

        Intent::PurchaseInterest => acknowledged(
            sender,
            session,
            reply::purchase().to_string(),
            "Purchase Intent",
            "User wants to buy".to_string(),
            StatusTag::HotLead,
            now,
        ),

        Intent::UrgentSupport => acknowledged(
            sender,
            session,
            reply::urgent(display_phone(sender)),
            "Urgent Support",
            "User needs immediate help".to_string(),
            StatusTag::Priority,
            now,
        ),

        Intent::CallbackRequest => acknowledged(
            sender,
            session,
            reply::callback(display_phone(sender)),
            "Callback Requested",
            "User wants a callback".to_string(),
            StatusTag::CallBack,
            now,
        ),

        Intent::NameIntroduction(name) => {
            let mut next = session.clone();
            next.display_name = Some(name.clone());
            next.touch(now);
            Turn {
                reply: reply::greeting(&name),
                event: Some(LogEvent::new(
                    sender,
                    Some(name.clone()),
                    "Name Provided",
                    format!("User introduced as {name}"),
                    StatusTag::QualifiedLead,
                    now,
                )),
                next,
            }
        }

        Intent::DemoScheduled(booking) => {
            let mut next = session.clone();
            next.touch(now);
            Turn {
                reply: reply::demo_confirmation(&booking.date, &booking.time, booking.name.as_deref()),
                event: Some(LogEvent::new(
                    sender,
                    booking.name.clone(),
                    "Demo Scheduled",
                    format!("Demo: {} at {}", booking.date, booking.time),
                    StatusTag::DemoBooked,
                    now,
                )),
                next,
            }
        }

        Intent::Unrecognized => acknowledged(
            sender,
            session,
            reply::fallback().to_string(),
            "Unknown Input",
            raw_text.trim().to_lowercase(),
            StatusTag::NeedsHelp,
            now,
        ),
    }
}

fn menu_choice_turn(sender: &str, session: &SessionState, choice: u8, now: DateTime<Utc>) -> Turn {
    let menu_open = session.step == ConversationStep::MenuSent;
    match reply::menu_option(choice) {
        Some(option) if menu_open => {
            let mut next = session.clone();
            next.step = ConversationStep::OptionSelected { choice };
            next.last_choice = Some(choice);
            next.touch(now);
            Turn {
                reply: option.text.to_string(),
                event: Some(LogEvent::new(
                    sender,
                    session.display_name.clone(),
                    option.label,
                    format!("User selected option {choice}"),
                    StatusTag::Interested,
                    now,
                )),
                next,
            }
        }
        // Unreachable through resolve(), which only emits MenuChoice for
        // 1..=5 while the menu is open. Guards direct callers of the table:
        // reply only, no state change, no event.
        _ => Turn {
            reply: reply::invalid_choice().to_string(),
            event: None,
            next: session.clone(),
        },
    }
}

fn acknowledged(
    sender: &str,
    session: &SessionState,
    reply: String,
    label: &str,
    detail: String,
    status: StatusTag,
    now: DateTime<Utc>,
) -> Turn {
    let mut next = session.clone();
    next.touch(now);
    Turn {
        reply,
        event: Some(LogEvent::new(
            sender,
            session.display_name.clone(),
            label,
            detail,
            status,
            now,
        )),
        next,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    const SENDER: &str = "15550001111@c.us";

    fn seeded_session() -> (SessionState, DateTime<Utc>) {
        let joined = Utc::now() - ChronoDuration::hours(2);
        let session = SessionState::new(joined);
        (session, joined)
    }

    #[test]
    fn greet_or_menu_opens_menu_and_logs_engaged() {
        let (session, joined) = seeded_session();
        let now = Utc::now();

        let turn = transition(SENDER, "hi", &session, Intent::GreetOrMenu, now);

        assert_eq!(turn.reply, reply::main_menu());
        assert_eq!(turn.next.step, ConversationStep::MenuSent);
        assert_eq!(turn.next.joined_at, joined);
        assert_eq!(turn.next.last_active_at, now);
        let event = turn.event.unwrap();
        assert_eq!(event.choice_label, "Main Menu Sent");
        assert_eq!(event.status, StatusTag::Engaged);
    }

    #[test]
    fn reopening_menu_preserves_profile_fields() {
        let (mut session, _) = seeded_session();
        session.display_name = Some("Priya".to_string());
        session.last_choice = Some(4);
        session.step = ConversationStep::OptionSelected { choice: 4 };

        let turn = transition(SENDER, "menu", &session, Intent::GreetOrMenu, Utc::now());

        assert_eq!(turn.next.display_name.as_deref(), Some("Priya"));
        assert_eq!(turn.next.last_choice, Some(4));
        assert_eq!(turn.event.unwrap().display_name.as_deref(), Some("Priya"));
    }

    #[test]
    fn valid_choice_from_open_menu_selects_option() {
        let (mut session, _) = seeded_session();
        session.step = ConversationStep::MenuSent;
        let now = Utc::now();

        let turn = transition(SENDER, "2", &session, Intent::MenuChoice(2), now);

        assert_eq!(turn.next.step, ConversationStep::OptionSelected { choice: 2 });
        assert_eq!(turn.next.last_choice, Some(2));
        let event = turn.event.unwrap();
        assert_eq!(event.choice_label, "Pricing Requested");
        assert_eq!(event.detail, "User selected option 2");
        assert_eq!(event.status, StatusTag::Interested);
    }

    #[test]
    fn defensive_choice_branch_mutates_nothing() {
        let (mut session, _) = seeded_session();
        session.step = ConversationStep::MenuSent;

        let turn = transition(SENDER, "7", &session, Intent::MenuChoice(7), Utc::now());

        assert_eq!(turn.reply, reply::invalid_choice());
        assert!(turn.event.is_none());
        assert_eq!(turn.next, session);
    }

    #[test]
    fn choice_outside_open_menu_is_defensive_too() {
        let (session, _) = seeded_session();

        let turn = transition(SENDER, "3", &session, Intent::MenuChoice(3), Utc::now());

        assert_eq!(turn.reply, reply::invalid_choice());
        assert!(turn.event.is_none());
        assert_eq!(turn.next, session);
    }

    #[test]
    fn purchase_marks_hot_lead_without_step_change() {
        let (mut session, _) = seeded_session();
        session.step = ConversationStep::OptionSelected { choice: 1 };

        let turn = transition(SENDER, "buy", &session, Intent::PurchaseInterest, Utc::now());

        assert_eq!(turn.next.step, ConversationStep::OptionSelected { choice: 1 });
        let event = turn.event.unwrap();
        assert_eq!(event.choice_label, "Purchase Intent");
        assert_eq!(event.status, StatusTag::HotLead);
    }

    #[test]
    fn urgent_reply_echoes_callback_phone() {
        let (session, _) = seeded_session();

        let turn = transition(SENDER, "urgent", &session, Intent::UrgentSupport, Utc::now());

        assert!(turn.reply.contains("Callback number: 15550001111"));
        assert_eq!(turn.event.unwrap().status, StatusTag::Priority);
    }

    #[test]
    fn callback_reply_echoes_phone() {
        let (session, _) = seeded_session();

        let turn = transition(SENDER, "call me", &session, Intent::CallbackRequest, Utc::now());

        assert!(turn.reply.contains("Phone: 15550001111"));
        let event = turn.event.unwrap();
        assert_eq!(event.choice_label, "Callback Requested");
        assert_eq!(event.status, StatusTag::CallBack);
    }

    #[test]
    fn name_introduction_sets_display_name() {
        let (session, _) = seeded_session();

        let turn = transition(
            SENDER,
            "my name is Ajay Kumar",
            &session,
            Intent::NameIntroduction("Ajay Kumar".to_string()),
            Utc::now(),
        );

        assert_eq!(turn.next.display_name.as_deref(), Some("Ajay Kumar"));
        assert!(turn.reply.contains("*Ajay Kumar*"));
        let event = turn.event.unwrap();
        assert_eq!(event.display_name.as_deref(), Some("Ajay Kumar"));
        assert_eq!(event.status, StatusTag::QualifiedLead);
        assert_eq!(event.detail, "User introduced as Ajay Kumar");
    }

    #[test]
    fn demo_confirmation_carries_booking_fields() {
        let (session, _) = seeded_session();
        let booking = crate::capture::DemoBooking {
            date: "25-09-2025".to_string(),
            time: "15:00".to_string(),
            name: None,
        };

        let turn = transition(
            SENDER,
            "25-09-2025 15:00",
            &session,
            Intent::DemoScheduled(booking),
            Utc::now(),
        );

        assert!(turn.reply.contains("Name: Not provided"));
        // Booking a demo does not change the conversation step.
        assert_eq!(turn.next.step, ConversationStep::New);
        let event = turn.event.unwrap();
        assert_eq!(event.detail, "Demo: 25-09-2025 at 15:00");
        assert_eq!(event.status, StatusTag::DemoBooked);
        assert!(event.display_name.is_none());
    }

    #[test]
    fn unrecognized_logs_normalized_body() {
        let (mut session, _) = seeded_session();
        session.step = ConversationStep::MenuSent;

        let turn = transition(SENDER, "  XyZzY  ", &session, Intent::Unrecognized, Utc::now());

        assert_eq!(turn.reply, reply::fallback());
        let event = turn.event.unwrap();
        assert_eq!(event.choice_label, "Unknown Input");
        assert_eq!(event.detail, "xyzzy");
        assert_eq!(event.status, StatusTag::NeedsHelp);
    }
}
