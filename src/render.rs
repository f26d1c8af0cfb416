//! Turns a roster snapshot into view nodes.
//!
//! Rendering is pure, [`Document::apply`] and [`Document::show_load_failure`] place the result
//! into the document. Every apply replaces the previous content entirely.

use roster_api_client::{Activity, Roster};

use crate::format::display_name;
use crate::view::{Document, Element, Node};

pub const LOADING: &str = "Loading activities...";
pub const LOAD_FAILED: &str = "Failed to load activities. Please try again later.";
pub const NO_PARTICIPANTS: &str = "No participants yet. Be the first!";
pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";

/// The rendered form of one roster snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterView {
    pub cards: Vec<Node>,
    pub options: Vec<Node>,
}

pub fn render(roster: &Roster) -> RosterView {
    RosterView {
        cards: roster
            .iter()
            .map(|(name, activity)| Node::from(activity_card(name, activity)))
            .collect(),
        options: select_options(roster.names()),
    }
}

/// Content of the activity container when the roster could not be fetched
pub fn render_failure() -> Vec<Node> {
    vec![Node::from(Element::new("p").child(LOAD_FAILED))]
}

/// Options of the activity select, always led by the disabled placeholder
pub fn select_options<'a>(names: impl Iterator<Item = &'a str>) -> Vec<Node> {
    let placeholder = Element::new("option")
        .attr("value", "")
        .attr("disabled", "disabled")
        .child(SELECT_PLACEHOLDER);

    std::iter::once(Node::from(placeholder))
        .chain(names.map(|name| {
            Node::from(Element::new("option").attr("value", name).child(name))
        }))
        .collect()
}

fn activity_card(name: &str, activity: &Activity) -> Element {
    let participants = if activity.participants.is_empty() {
        Element::new("p")
            .class("no-participants")
            .child(NO_PARTICIPANTS)
    } else {
        participants_section(name, &activity.participants)
    };

    Element::new("div")
        .class("activity-card")
        .attr("data-activity", name)
        .child(Element::new("h4").child(name))
        .child(Element::new("p").child(activity.description.clone()))
        .child(labeled("Schedule:", activity.schedule.clone()))
        .child(labeled(
            "Availability:",
            format!("{} spots left", activity.spots_left()),
        ))
        .child(participants)
}

fn labeled(label: &str, value: String) -> Element {
    Element::new("p")
        .child(Element::new("strong").child(label))
        .child(format!(" {}", value))
}

fn participants_section(activity: &str, participants: &[String]) -> Element {
    let entries = participants.iter().map(|participant| {
        let name = display_name(participant);

        let entry = Element::new("li")
            .class("participant-item")
            .attr("title", participant.clone())
            .child(
                Element::new("span")
                    .class("participant-badge")
                    .child(name.clone()),
            )
            .child(
                Element::new("button")
                    .class("unregister-btn")
                    .attr("data-email", participant.clone())
                    .attr("data-activity", activity)
                    .attr("aria-label", format!("Unregister {}", name))
                    .child("✖"),
            );

        Node::from(entry)
    });

    Element::new("div")
        .class("participants-section")
        .child(
            Element::new("h5")
                .class("participants-title")
                .child(format!("Participants ({})", participants.len())),
        )
        .child(Element::new("ul").class("participants-list").children(entries))
}

impl Document {
    /// Replaces cards and select options with a freshly rendered roster
    pub fn apply(&mut self, view: RosterView) {
        self.activities_list.clear();
        self.activities_list.children = view.cards;

        self.activity_select.clear();
        self.activity_select.children = view.options;
    }

    /// Replaces all cards with the load failure notice, the select is left alone
    pub fn show_load_failure(&mut self) {
        self.activities_list.clear();
        self.activities_list.children = render_failure();
    }
}
