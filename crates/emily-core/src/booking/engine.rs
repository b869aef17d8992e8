//! The conversational booking dialogue engine.
//!
//! `BookingDialogueEngine` walks a visitor from booking intent through
//! family verification or registration, visit-type selection, and booking
//! submission. It owns one [`BookingSession`] and mutates it exclusively;
//! each handled input returns an ordered list of [`EngineEvent`]s for the
//! host to render. Unrecognized input returns `NotHandled` so the host can
//! route it to its general Q&A path.

use std::sync::Arc;

use chrono::Local;

use super::intent::detect_booking_intent;
use super::session::{BookingSession, BookingType};
use super::stage::BookingStage;
use super::turn::{Choice, DialogueTurn, EngineEvent, MessageOutcome};
use crate::backend::{AdmissionsBackend, BookingRequest};
use crate::config::EngineConfig;
use crate::enquiry::{EnquiryData, split_full_name};
use crate::error::{EmilyError, Result};
use crate::event::upcoming_events;

/// Drives one visitor's booking conversation.
///
/// One instance per conversation; never shared across visitors. The
/// exclusive `&mut self` borrow across backend awaits means responses are
/// always applied to the stage that issued the request, so a slow response
/// can never corrupt a flow that has since moved on.
pub struct BookingDialogueEngine {
    session: BookingSession,
    backend: Arc<dyn AdmissionsBackend>,
    config: EngineConfig,
}

impl BookingDialogueEngine {
    /// Creates a new engine with an idle session.
    pub fn new(backend: Arc<dyn AdmissionsBackend>, config: EngineConfig) -> Self {
        Self {
            session: BookingSession::new(),
            backend,
            config,
        }
    }

    /// Read-only view of the session state.
    pub fn session(&self) -> &BookingSession {
        &self.session
    }

    /// Restores the session to its initial idle shape.
    pub fn reset(&mut self) {
        self.session.reset();
        tracing::debug!("booking session reset");
    }

    /// Single entry point for all visitor input while the engine is active.
    ///
    /// Dispatch order: prospectus-view clicks (any stage), then the
    /// `continue_booking` button (specific stages), then intent detection
    /// (idle only), then the stage-specific handler.
    ///
    /// # Returns
    ///
    /// - `Ok(Handled(events))`: the input was consumed; render the events
    /// - `Ok(NotHandled)`: forward the input to general Q&A
    ///
    /// # Errors
    ///
    /// Only internal invariant violations surface as errors; backend and
    /// validation failures become user-facing recovery turns instead.
    pub async fn handle_message(&mut self, message: &str) -> Result<MessageOutcome> {
        let stage = self.session.stage;
        tracing::debug!(?stage, message, "handling visitor input");

        // Prospectus button works in any stage and mutates nothing.
        if let Some(url) = message.strip_prefix("view_prospectus|") {
            return Ok(self.open_prospectus(url));
        }

        if message == "continue_booking" && stage.accepts_continue_booking() {
            self.session.stage = BookingStage::ChoosingEventType;
            return Ok(MessageOutcome::Handled(vec![
                EngineEvent::Say(DialogueTurn::say("Now, let's get that visit booked for you...")),
                EngineEvent::Say(self.ask_event_type()),
            ]));
        }

        if stage == BookingStage::Idle && detect_booking_intent(message) {
            return Ok(self.start_booking_flow());
        }

        match stage {
            BookingStage::AskingRegistration => Ok(self.handle_registration_response(message)),
            BookingStage::VerifyingFamily => self.handle_verification_input(message).await,
            BookingStage::CollectingEnquiry => {
                // The form itself arrives via `submit_enquiry_form`; the only
                // chat input consumed here is a retry after a failed submit.
                if message == "retry_enquiry" && self.session.enquiry_data.is_some() {
                    self.submit_stored_enquiry().await
                } else {
                    Ok(MessageOutcome::NotHandled)
                }
            }
            BookingStage::ChoosingEventType => self.handle_event_type_choice(message).await,
            BookingStage::ShowingEvents => Ok(self.handle_event_selection(message)),
            BookingStage::CollectingBookingDetails => {
                self.handle_booking_details_response(message).await
            }
            BookingStage::Idle
            | BookingStage::WaitingForProspectusView
            | BookingStage::Completed => Ok(MessageOutcome::NotHandled),
        }
    }

    /// Accepts the completed enquiry form for a new family.
    ///
    /// This is the form-submission counterpart to `handle_message`: the
    /// host renders the form on `ShowEnquiryForm` and posts it back here in
    /// one piece. Submissions outside `CollectingEnquiry` are ignored so a
    /// stale form cannot corrupt a flow that has moved on.
    pub async fn submit_enquiry_form(&mut self, form: EnquiryData) -> Result<MessageOutcome> {
        if self.session.stage != BookingStage::CollectingEnquiry {
            tracing::warn!(stage = ?self.session.stage, "enquiry form submitted outside collecting stage");
            return Ok(MessageOutcome::NotHandled);
        }

        if let Err(corrective) = form.validate() {
            self.session.enquiry_data = Some(form);
            return Ok(MessageOutcome::Handled(vec![EngineEvent::Say(
                DialogueTurn::say(corrective),
            )]));
        }

        self.session.enquiry_data = Some(form);
        self.submit_stored_enquiry().await
    }

    fn open_prospectus(&self, url: &str) -> MessageOutcome {
        // The backend returns a literal "null" path when no prospectus was
        // generated; treat that the same as a missing URL.
        if url.is_empty() || url == "null" || url.ends_with("/null") {
            tracing::warn!(url, "ignoring invalid prospectus URL");
            return MessageOutcome::Handled(vec![]);
        }
        MessageOutcome::Handled(vec![EngineEvent::OpenUrl(url.to_string())])
    }

    fn start_booking_flow(&mut self) -> MessageOutcome {
        self.session.stage = BookingStage::AskingRegistration;
        tracing::info!("booking flow started");

        let greeting = format!(
            "Lovely! I'd be delighted to help you book an open day. First, have you \
             already registered or enquired with {} before?",
            self.config.school_name
        );
        MessageOutcome::Handled(vec![EngineEvent::Say(DialogueTurn::with_choices(
            greeting,
            vec![
                Choice::button("Yes, I have", "yes_registered"),
                Choice::button("No, I'm new", "no_new"),
            ],
        ))])
    }

    fn handle_registration_response(&mut self, message: &str) -> MessageOutcome {
        let lower = message.to_lowercase();

        if lower.contains("yes") || lower == "yes_registered" {
            self.session.is_new_family = Some(false);
            self.session.stage = BookingStage::VerifyingFamily;

            MessageOutcome::Handled(vec![EngineEvent::Say(DialogueTurn::say(
                "Brilliant! Let me quickly verify your details. What's your email address?",
            ))])
        } else if lower.contains("no") || lower == "no_new" {
            let intro = format!(
                "Welcome to {}! Please complete this form to register. You'll also \
                 receive a personalised prospectus tailored to your daughter's \
                 interests and your family's priorities.",
                self.config.school_name
            );
            MessageOutcome::Handled(self.begin_new_registration(intro))
        } else {
            MessageOutcome::NotHandled
        }
    }

    /// Switches the session onto the new-registration path and asks the
    /// host to render the enquiry form. Shared by the "no, I'm new" answer
    /// and the verification not-found warm handoff.
    fn begin_new_registration(&mut self, intro: String) -> Vec<EngineEvent> {
        self.session.is_new_family = Some(true);
        self.session.stage = BookingStage::CollectingEnquiry;

        vec![
            EngineEvent::Say(DialogueTurn::say(intro)),
            EngineEvent::ShowEnquiryForm,
        ]
    }

    async fn handle_verification_input(&mut self, message: &str) -> Result<MessageOutcome> {
        let email = message.trim();

        if !email.contains('@') {
            return Ok(MessageOutcome::Handled(vec![EngineEvent::Say(
                DialogueTurn::say(
                    "That doesn't look like a valid email address. Could you please try again?",
                ),
            )]));
        }

        let mut events = vec![EngineEvent::Say(DialogueTurn::say(
            "Just a moment, let me check our system...",
        ))];

        match self.backend.verify_family(email).await {
            Ok(Some(parent)) => {
                tracing::info!(inquiry_id = parent.inquiry_id, "family verified");
                let parent_name = if parent.name.is_empty() {
                    "there".to_string()
                } else {
                    parent.name.clone()
                };

                self.session.inquiry_id = Some(parent.inquiry_id);
                self.session.verified_family = Some(parent);
                self.session.stage = BookingStage::ChoosingEventType;

                events.push(EngineEvent::Say(DialogueTurn::say(format!(
                    "Perfect! I found your details. Welcome back, {parent_name}!"
                ))));
                events.push(EngineEvent::Say(self.ask_event_type()));
            }
            Ok(None) => {
                // Warm handoff: no error shown, just the registration form.
                tracing::info!("family not found, redirecting to registration");
                let intro = "I couldn't find your details in our system, but no problem! \
                             Let me take you through our quick registration form. You'll \
                             also receive a personalised prospectus tailored to your \
                             daughter's interests and your family's priorities."
                    .to_string();
                events.extend(self.begin_new_registration(intro));
            }
            Err(err) => {
                tracing::warn!(error = %err, "family verification failed");
                events.push(EngineEvent::Say(DialogueTurn::with_choices(
                    "Sorry, I'm having trouble checking our system right now. Would you \
                     like to continue as a new registration instead?",
                    vec![
                        Choice::button("Yes, continue", "no_new"),
                        Choice::button("Try again later", "cancel"),
                    ],
                )));
            }
        }

        Ok(MessageOutcome::Handled(events))
    }

    /// Submits the stored enquiry data to the prospectus app.
    ///
    /// Kept separate from `submit_enquiry_form` so a `retry_enquiry` click
    /// after a backend failure resubmits without re-rendering the form.
    async fn submit_stored_enquiry(&mut self) -> Result<MessageOutcome> {
        let form = self
            .session
            .enquiry_data
            .clone()
            .ok_or_else(|| EmilyError::internal("enquiry submission without stored form data"))?;

        let mut events = vec![EngineEvent::Say(DialogueTurn::say(
            "Brilliant! I'm just submitting your details and creating your personalised \
             prospectus...",
        ))];

        match self.backend.submit_enquiry(&form.prospectus_payload()).await {
            Ok(outcome) => {
                tracing::info!(inquiry_id = ?outcome.inquiry_id, "enquiry submitted");
                self.session.inquiry_id = outcome.inquiry_id;
                self.session.prospectus_slug = outcome.slug;
                self.session.prospectus_url = outcome.prospectus_url.clone();
                self.session.stage = BookingStage::WaitingForProspectusView;

                let text = format!(
                    "Perfect! Your personalised prospectus for {} has been created and \
                     emailed to you.\n\nClick below to view it, then we'll continue with \
                     booking your tour:",
                    form.first_name
                );

                if let Some(url) = outcome.prospectus_url {
                    events.push(EngineEvent::OpenUrl(url.clone()));
                    events.push(EngineEvent::Say(DialogueTurn::with_choices(
                        text,
                        vec![
                            Choice::button("View Prospectus", format!("view_prospectus|{url}")),
                            Choice::button("Continue to Booking", "continue_booking"),
                        ],
                    )));
                } else {
                    events.push(EngineEvent::Say(DialogueTurn::with_choices(
                        text,
                        vec![Choice::button("Continue to Booking", "continue_booking")],
                    )));
                }
            }
            Err(err) => {
                // Collected form data stays on the session so a retry does
                // not force re-entry.
                tracing::warn!(error = %err, "enquiry submission failed");
                events.push(EngineEvent::Say(DialogueTurn::with_choices(
                    "I'm terribly sorry, but I'm having trouble submitting your details \
                     right now. Would you like to try again, or shall I connect you with \
                     our admissions team directly?",
                    vec![
                        Choice::button("Try again", "retry_enquiry"),
                        Choice::button("Speak to admissions", "contact_admissions"),
                    ],
                )));
            }
        }

        Ok(MessageOutcome::Handled(events))
    }

    fn ask_event_type(&self) -> DialogueTurn {
        DialogueTurn::with_choices(
            "What type of visit would you like to book?",
            vec![
                Choice::button("Open Day", "open_day"),
                Choice::button("Private Tour", "private_tour"),
            ],
        )
    }

    async fn handle_event_type_choice(&mut self, message: &str) -> Result<MessageOutcome> {
        match message {
            "open_day" | "retry_events" => self.show_available_events().await,
            "private_tour" => {
                self.session.booking_type = BookingType::PrivateTour;
                self.session.stage = BookingStage::CollectingBookingDetails;

                Ok(MessageOutcome::Handled(vec![EngineEvent::Say(
                    DialogueTurn::with_choices(
                        "Perfect! I'll help you request a private tour. How many people \
                         will be attending?",
                        attendee_count_choices(true),
                    ),
                )]))
            }
            _ => Ok(MessageOutcome::NotHandled),
        }
    }

    /// Fetches open days, filters to today-or-future, and either lists them
    /// or offers a private tour when none remain.
    ///
    /// The stage only advances to `ShowingEvents` when there is an actual
    /// listing, so the fallback buttons stay actionable in
    /// `ChoosingEventType`.
    async fn show_available_events(&mut self) -> Result<MessageOutcome> {
        let mut events = vec![EngineEvent::Say(DialogueTurn::say(
            "Let me check what open days we have coming up...",
        ))];

        match self.backend.list_events().await {
            Ok(all) => {
                let today = Local::now().date_naive();
                let upcoming = upcoming_events(all, today);

                if upcoming.is_empty() {
                    tracing::info!("no upcoming open days, offering private tour");
                    events.push(EngineEvent::Say(DialogueTurn::with_choices(
                        "I'm sorry, we don't have any open days scheduled at the moment. \
                         Would you like to request a private tour instead?",
                        vec![
                            Choice::button("Yes, private tour", "private_tour"),
                            Choice::button("I'll check back later", "cancel"),
                        ],
                    )));
                } else {
                    let listing = upcoming
                        .iter()
                        .map(|event| {
                            format!(
                                "{}\nDate: {}\nTime: {} - {}\nAvailability: {} places remaining",
                                event.title,
                                event.long_date(),
                                event.start_time,
                                event.end_time,
                                event.spots_left()
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n\n");

                    let buttons = upcoming
                        .iter()
                        .map(|event| Choice::button(event.short_date(), format!("event_{}", event.id)))
                        .collect();

                    self.session.available_events = upcoming;
                    self.session.stage = BookingStage::ShowingEvents;

                    events.push(EngineEvent::Say(DialogueTurn::with_choices(
                        format!(
                            "Here are our upcoming open days:\n\n{listing}\n\nWhich one \
                             would you like to attend?"
                        ),
                        buttons,
                    )));
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch open-day events");
                events.push(EngineEvent::Say(DialogueTurn::with_choices(
                    "I'm having trouble loading our open days right now. Would you like \
                     to request a private tour instead, or try again?",
                    vec![
                        Choice::button("Private tour", "private_tour"),
                        Choice::button("Try again", "retry_events"),
                    ],
                )));
            }
        }

        Ok(MessageOutcome::Handled(events))
    }

    /// Resolves an `event_<id>` selection against the session's cached
    /// listing. Unknown ids are not consumed; re-fetching here could race
    /// with concurrently-changing availability.
    fn handle_event_selection(&mut self, message: &str) -> MessageOutcome {
        let Some(id) = message
            .strip_prefix("event_")
            .and_then(|raw| raw.parse::<i64>().ok())
        else {
            return MessageOutcome::NotHandled;
        };

        let Some(event) = self
            .session
            .available_events
            .iter()
            .find(|event| event.id == id)
            .cloned()
        else {
            tracing::warn!(id, "selected event not in session cache");
            return MessageOutcome::NotHandled;
        };

        tracing::info!(id, title = %event.title, "open-day event selected");
        let text = format!(
            "Wonderful choice! I've selected the {} on {}.\n\nHow many people will be \
             attending?",
            event.title,
            event.spoken_date()
        );

        self.session.selected_event = Some(event);
        self.session.booking_type = BookingType::OpenDay;
        self.session.stage = BookingStage::CollectingBookingDetails;

        MessageOutcome::Handled(vec![EngineEvent::Say(DialogueTurn::with_choices(
            text,
            attendee_count_choices(false),
        ))])
    }

    /// Steps through the sequential booking detail answers: attendee count,
    /// then (private tours) preferred date and time, then special
    /// requirements, then submission.
    async fn handle_booking_details_response(&mut self, message: &str) -> Result<MessageOutcome> {
        let is_private_tour = self.session.booking_type == BookingType::PrivateTour;
        let details = &mut self.session.booking_details;

        if details.num_attendees.is_none() {
            let Some(count) = parse_attendee_count(message) else {
                return Ok(MessageOutcome::Handled(vec![EngineEvent::Say(
                    DialogueTurn::say(
                        "Sorry, I didn't catch that. How many people will be attending? \
                         Please give me a number.",
                    ),
                )]));
            };
            details.num_attendees = Some(count);

            let turn = if is_private_tour {
                DialogueTurn::with_choices(
                    "Great! Please select your preferred date for the private tour:",
                    vec![Choice::Date {
                        label: "Select Date".to_string(),
                    }],
                )
            } else {
                DialogueTurn::say(
                    "Perfect! And finally, do you have any dietary requirements or \
                     special needs we should know about? (Or just say 'none')",
                )
            };
            Ok(MessageOutcome::Handled(vec![EngineEvent::Say(turn)]))
        } else if is_private_tour && details.preferred_date.is_none() {
            details.preferred_date = Some(message.trim().to_string());

            Ok(MessageOutcome::Handled(vec![EngineEvent::Say(
                DialogueTurn::with_choices(
                    "Thanks! Now please select your preferred time:",
                    vec![Choice::Time {
                        label: "Select Time".to_string(),
                    }],
                ),
            )]))
        } else if is_private_tour && details.preferred_time.is_none() {
            details.preferred_time = Some(message.trim().to_string());

            Ok(MessageOutcome::Handled(vec![EngineEvent::Say(
                DialogueTurn::say(
                    "Perfect! Finally, do you have any dietary requirements or special \
                     needs we should know about? (Or just say 'none')",
                ),
            )]))
        } else {
            // The literal value 'none' (exact match) means no requirements.
            details.special_requirements = Some(if message == "none" {
                String::new()
            } else {
                message.to_string()
            });

            self.submit_booking().await
        }
    }

    async fn submit_booking(&mut self) -> Result<MessageOutcome> {
        let is_private_tour = self.session.booking_type == BookingType::PrivateTour;

        let mut events = vec![EngineEvent::Say(DialogueTurn::say(if is_private_tour {
            "Excellent! Let me submit your private tour request..."
        } else {
            "Excellent! Let me confirm your booking..."
        }))];

        let request = self.build_booking_request()?;

        match self.backend.create_booking(&request).await {
            Ok(_) => {
                tracing::info!(booking_type = %request.booking_type, "booking confirmed");
                self.session.stage = BookingStage::Completed;

                let parent_first_name = self.session.parent_first_name();
                let closing = if parent_first_name.is_empty() {
                    "Is there anything else I can help you with? Anything you'd like to \
                     know about the school?"
                        .to_string()
                } else {
                    format!(
                        "{parent_first_name}, is there anything else I can help you \
                         with? Anything you'd like to know about the school?"
                    )
                };

                let confirmation = if is_private_tour {
                    format!(
                        "All done! Your private tour request has been submitted.\n\nOur \
                         admissions team will check availability for your preferred date \
                         and time. If your requested slot is available, you'll receive a \
                         confirmation email shortly. If not, we'll offer alternative \
                         dates and times that work for you.\n\n{closing}"
                    )
                } else {
                    match &self.session.selected_event {
                        Some(event) => format!(
                            "All done! Your booking is confirmed for {} on {} at {}.\n\n\
                             You'll receive a confirmation email shortly with all the \
                             details. We look forward to welcoming you to {}!\n\n{closing}",
                            event.title,
                            event.spoken_date(),
                            event.start_time,
                            self.config.school_name
                        ),
                        None => format!(
                            "All done! Your booking is confirmed.\n\nYou'll receive a \
                             confirmation email shortly with all the details.\n\n{closing}"
                        ),
                    }
                };

                events.push(EngineEvent::Say(DialogueTurn::say(confirmation)));
                events.push(EngineEvent::BookingCompleted);
            }
            Err(err) => {
                // Terminal failure path: admissions contact details, no
                // retry choices. The session stays where it is.
                tracing::warn!(error = %err, "booking submission failed");
                events.push(EngineEvent::Say(DialogueTurn::say(format!(
                    "I'm terribly sorry, but I encountered an issue while confirming \
                     your booking. Please contact our admissions team directly at {} or \
                     call {}.",
                    self.config.admissions_email, self.config.admissions_phone
                ))));
            }
        }

        Ok(MessageOutcome::Handled(events))
    }

    /// Assembles the booking payload from the session.
    ///
    /// Identity comes from the verified family when returning, else from
    /// the enquiry form. Private tours carry preferred date/time (empty
    /// string when unset, never null); open days carry the event id.
    fn build_booking_request(&self) -> Result<BookingRequest> {
        let session = &self.session;
        let is_private_tour = session.booking_type == BookingType::PrivateTour;
        let details = &session.booking_details;

        let num_attendees = details
            .num_attendees
            .ok_or_else(|| EmilyError::internal("booking submission without attendee count"))?;

        let (parent_first, parent_last, email, phone, student_first, student_last, age_group) =
            if let Some(parent) = &session.verified_family {
                let (first, last) = parent.split_parent_name();
                (
                    first,
                    last,
                    parent.email.clone(),
                    parent.contact_number.clone(),
                    parent.first_name.clone(),
                    parent.family_surname.clone(),
                    parent.age_group.clone(),
                )
            } else if let Some(enquiry) = &session.enquiry_data {
                let (first, last) = split_full_name(&enquiry.parent_name);
                (
                    first,
                    last,
                    enquiry.parent_email.clone(),
                    enquiry.contact_number.clone(),
                    enquiry.first_name.clone(),
                    enquiry.family_surname.clone(),
                    enquiry.age_group.clone(),
                )
            } else {
                return Err(EmilyError::internal(
                    "booking submission without an identity source",
                ));
            };

        Ok(BookingRequest {
            school_id: self.config.school_id,
            booking_type: session.booking_type.as_str().to_string(),
            inquiry_id: session.inquiry_id,
            num_attendees,
            special_requirements: details.special_requirements.clone().unwrap_or_default(),
            event_id: if is_private_tour {
                None
            } else {
                session.selected_event.as_ref().map(|event| event.id)
            },
            preferred_date: is_private_tour
                .then(|| details.preferred_date.clone().unwrap_or_default()),
            preferred_time: is_private_tour
                .then(|| details.preferred_time.clone().unwrap_or_default()),
            parent_first_name: parent_first,
            parent_last_name: parent_last,
            email,
            phone,
            student_first_name: student_first,
            student_last_name: student_last,
            age_group,
        })
    }
}

/// Parses an attendee count from a button value or free text.
///
/// Reads the leading digits of the trimmed input, so "5+" and "5+ people"
/// both give 5. Zero and digit-free input are rejected.
fn parse_attendee_count(message: &str) -> Option<u32> {
    let trimmed = message.trim();
    let digits: String = trimmed
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();

    match digits.parse::<u32>() {
        Ok(count) if count > 0 => Some(count),
        _ => None,
    }
}

/// Attendee count buttons. Private tours offer the "5+" option.
fn attendee_count_choices(include_five_plus: bool) -> Vec<Choice> {
    let mut choices = vec![
        Choice::button("1 person", "1"),
        Choice::button("2 people", "2"),
        Choice::button("3 people", "3"),
        Choice::button("4 people", "4"),
    ];
    if include_five_plus {
        // "5+" maps to the literal value 5
        choices.push(Choice::button("5+ people", "5"));
    }
    choices
}
