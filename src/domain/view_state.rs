// Dashboard view state, moved forward only by discrete actions
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Food,
    Medications,
    Data,
    Chat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MedicationDraft {
    pub name: String,
    pub dosage: String,
    pub time: String,
}

impl MedicationDraft {
    /// All three fields are needed before the entry can be saved.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.dosage, &self.time]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Name(String),
    Dosage(String),
    Time(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectTab(Tab),
    SelectDate(NaiveDate),
    EditMedicationDraft(DraftField),
    ClearMedicationDraft,
    EditChatDraft(String),
    ClearChatDraft,
    SignOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub tab: Tab,
    pub selected_date: Option<NaiveDate>,
    pub medication_draft: MedicationDraft,
    pub chat_draft: String,
}

impl ViewState {
    /// A changed date means the timeline must be recomputed.
    pub fn needs_timeline(&self, previous: &ViewState) -> bool {
        self.tab == Tab::Dashboard
            && (previous.tab != Tab::Dashboard || previous.selected_date != self.selected_date)
    }
}

pub fn reduce(state: &ViewState, action: Action) -> ViewState {
    let mut next = state.clone();
    match action {
        Action::SelectTab(tab) => next.tab = tab,
        Action::SelectDate(date) => next.selected_date = Some(date),
        Action::EditMedicationDraft(field) => match field {
            DraftField::Name(name) => next.medication_draft.name = name,
            DraftField::Dosage(dosage) => next.medication_draft.dosage = dosage,
            DraftField::Time(time) => next.medication_draft.time = time,
        },
        Action::ClearMedicationDraft => next.medication_draft = MedicationDraft::default(),
        Action::EditChatDraft(text) => next.chat_draft = text,
        Action::ClearChatDraft => next.chat_draft.clear(),
        Action::SignOut => next = ViewState::default(),
    }
    next
}
