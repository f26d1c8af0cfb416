//! The fixed attachment points of the page.

use crate::banner::OutcomeMessage;
use crate::controller::Command;
use crate::render;
use crate::view::{Element, Node};

pub const ACTIVITIES_LIST_ID: &str = "activities-list";
pub const ACTIVITY_SELECT_ID: &str = "activity";
pub const SIGNUP_FORM_ID: &str = "signup-form";
pub const MESSAGE_ID: &str = "message";

/// Everything the roster client draws into
///
/// The document is owned by the host and shared with the store and the banner. It holds no
/// roster state of its own, only what is currently visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Container for the activity cards
    pub activities_list: Element,
    /// Activity selection of the signup form
    pub activity_select: Element,
    pub signup_form: SignupForm,
    pub message: MessageElement,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            activities_list: Element::new("div")
                .attr("id", ACTIVITIES_LIST_ID)
                .child(Element::new("p").child(render::LOADING)),
            activity_select: Element::new("select")
                .attr("id", ACTIVITY_SELECT_ID)
                .attr("name", ACTIVITY_SELECT_ID)
                .children(render::select_options(std::iter::empty())),
            signup_form: SignupForm::default(),
            message: MessageElement::default(),
        }
    }

    /// Activity cards currently shown, in display order
    pub fn cards(&self) -> Vec<&Element> {
        self.activities_list
            .child_elements()
            .filter(|element| element.has_class("activity-card"))
            .collect()
    }

    /// Values of all selectable activity options, the placeholder excluded
    pub fn activity_options(&self) -> Vec<&str> {
        self.activity_select
            .child_elements()
            .filter(|option| option.attribute("disabled").is_none())
            .filter_map(|option| option.attribute("value"))
            .collect()
    }

    /// The unregister commands behind every rendered removal control, in document order
    pub fn removal_controls(&self) -> Vec<Command> {
        self.activities_list
            .find_all(&|element| element.has_class("unregister-btn"))
            .into_iter()
            .filter_map(|button| {
                Some(Command::Unregister {
                    activity: button.attribute("data-activity")?.to_owned(),
                    email: button.attribute("data-email")?.to_owned(),
                })
            })
            .collect()
    }

    /// Serializes the attachment points as an HTML fragment
    pub fn to_html(&self) -> String {
        let mut select = self.activity_select.clone();

        for option in select.children.iter_mut() {
            if let Node::Element(option) = option {
                if option.attribute("value") == Some(self.signup_form.activity.as_str())
                    && !self.signup_form.activity.is_empty()
                {
                    option.set_attribute("selected", "selected");
                }
            }
        }

        let form = Element::new("form")
            .attr("id", SIGNUP_FORM_ID)
            .child(
                Element::new("input")
                    .attr("type", "email")
                    .attr("id", "email")
                    .attr("name", "email")
                    .attr("value", self.signup_form.email.clone()),
            )
            .child(select)
            .child(Element::new("button").attr("type", "submit").child("Sign Up"));

        let mut out = String::new();
        self.activities_list.write_html(&mut out);
        out.push('\n');
        form.write_html(&mut out);
        out.push('\n');
        self.message.to_element().write_html(&mut out);
        out.push('\n');
        out
    }
}

/// Field values of the signup form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub activity: String,
}

impl SignupForm {
    pub fn reset(&mut self) {
        self.email.clear();
        self.activity.clear();
    }
}

/// The notification element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageElement {
    pub outcome: Option<OutcomeMessage>,
    pub hidden: bool,
}

impl Default for MessageElement {
    fn default() -> Self {
        Self {
            outcome: None,
            hidden: true,
        }
    }
}

impl MessageElement {
    pub fn show(&mut self, outcome: OutcomeMessage) {
        self.outcome = Some(outcome);
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// The message if it is currently visible
    pub fn visible(&self) -> Option<&OutcomeMessage> {
        if self.hidden {
            None
        } else {
            self.outcome.as_ref()
        }
    }

    pub fn to_element(&self) -> Element {
        let mut class = self
            .outcome
            .as_ref()
            .map(|outcome| outcome.kind.as_class().to_owned())
            .unwrap_or_default();

        if self.hidden {
            if !class.is_empty() {
                class.push(' ');
            }
            class.push_str("hidden");
        }

        let element = Element::new("div").attr("id", MESSAGE_ID).class(class);

        match &self.outcome {
            Some(outcome) => element.child(outcome.text.clone()),
            None => element,
        }
    }
}
