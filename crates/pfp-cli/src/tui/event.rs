/// Actions the UI sends to the async worker task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    /// Close the Quick View and search for a label.
    Search { label: String },
    /// Open the Quick View for one identity and load its sources.
    OpenDetail { identifier: String },
    /// Close the Quick View, cancelling any running load.
    CloseDetail,
}
