use crate::api::{ApiClient, ApiError, SessionSettings};
use crate::session::SessionPlan;

pub const LOAD_ERROR: &str = "Could not load categories. Is the backend running?";
pub const DURATION_ERROR: &str = "Duration must be at least 1 second";
pub const COUNT_ERROR: &str = "Number of images must be at least 1";
pub const SUBMIT_ERROR: &str = "Failed to start session.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Category,
    Duration,
    Count,
}

/// State of the setup screen: the fetched category list, the two numeric
/// inputs, and whatever inline error is currently showing
#[derive(Debug)]
pub struct SetupForm {
    pub categories: Vec<String>,
    pub selected: usize,
    pub duration_input: String,
    pub count_input: String,
    pub focus: Field,
    pub error: Option<String>,
    pub submitting: bool,
}

impl SetupForm {
    /// Fetch the category list and build the form around it. A failed fetch
    /// leaves the form usable but empty, with submission disabled.
    pub fn load(api: &ApiClient, duration_prefill: u32, count_prefill: u32) -> Self {
        match api.categories() {
            Ok(categories) => Self::with_categories(categories, duration_prefill, count_prefill),
            Err(_) => {
                let mut form = Self::with_categories(Vec::new(), duration_prefill, count_prefill);
                form.error = Some(LOAD_ERROR.to_string());
                form
            }
        }
    }

    pub fn with_categories(
        categories: Vec<String>,
        duration_prefill: u32,
        count_prefill: u32,
    ) -> Self {
        Self {
            categories,
            selected: 0,
            duration_input: duration_prefill.to_string(),
            count_input: count_prefill.to_string(),
            focus: Field::Category,
            error: None,
            submitting: false,
        }
    }

    /// Fetch the category list again in place, keeping the numeric inputs
    pub fn reload_categories(&mut self, api: &ApiClient) {
        self.selected = 0;
        match api.categories() {
            Ok(categories) => {
                self.categories = categories;
                self.error = None;
            }
            Err(_) => {
                self.categories.clear();
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.categories.get(self.selected).map(String::as_str)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Category => Field::Duration,
            Field::Duration => Field::Count,
            Field::Count => Field::Category,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Field::Category => Field::Count,
            Field::Duration => Field::Category,
            Field::Count => Field::Duration,
        };
    }

    pub fn select_next_category(&mut self) {
        if !self.categories.is_empty() {
            self.selected = (self.selected + 1) % self.categories.len();
        }
    }

    pub fn select_prev_category(&mut self) {
        if !self.categories.is_empty() {
            self.selected = (self.selected + self.categories.len() - 1) % self.categories.len();
        }
    }

    /// Append a typed character to the focused numeric field. Anything but
    /// an ASCII digit is rejected outright, leaving prior input untouched.
    pub fn push_char(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        match self.focus {
            Field::Duration => self.duration_input.push(c),
            Field::Count => self.count_input.push(c),
            Field::Category => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Field::Duration => {
                self.duration_input.pop();
            }
            Field::Count => {
                self.count_input.pop();
            }
            Field::Category => {}
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.categories.is_empty()
    }

    /// Parse and check both numeric fields; duration first, one message at
    /// a time
    pub fn validate(&self) -> Result<SessionSettings, &'static str> {
        let duration = self.duration_input.parse::<u32>().unwrap_or(0);
        if duration < 1 {
            return Err(DURATION_ERROR);
        }

        let count = self.count_input.parse::<u32>().unwrap_or(0);
        if count < 1 {
            return Err(COUNT_ERROR);
        }

        Ok(SessionSettings {
            category: self.selected_category().unwrap_or("").to_string(),
            count,
            duration,
        })
    }

    /// Validate and arm the busy state; the caller renders one frame with
    /// the busy label and then completes the request via `finish_submit`
    pub fn begin_submit(&mut self) -> Option<SessionSettings> {
        if !self.can_submit() {
            return None;
        }

        match self.validate() {
            Ok(settings) => {
                self.error = None;
                self.submitting = true;
                Some(settings)
            }
            Err(msg) => {
                self.error = Some(msg.to_string());
                None
            }
        }
    }

    /// Fold the session response back into the form; Some(plan) means the
    /// caller should enter the session. A failure re-enables the form with
    /// all input preserved.
    pub fn finish_submit(&mut self, result: Result<SessionPlan, ApiError>) -> Option<SessionPlan> {
        self.submitting = false;
        match result {
            Ok(plan) => Some(plan),
            Err(_) => {
                self.error = Some(SUBMIT_ERROR.to_string());
                None
            }
        }
    }
}
