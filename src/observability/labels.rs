use metrics::{IntoLabels, Label, SharedString};

/// Holder of multiple [Label] providing some methods to easily clone and adds new labels in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels(Vec<Label>);

pub const NO_LABEL: Labels = Labels(vec![]);

impl Labels {
    pub fn empty() -> Self {
        NO_LABEL
    }

    pub fn new(
        labels: &[(
            impl Into<SharedString> + Clone,
            impl Into<SharedString> + Clone,
        )],
    ) -> Self {
        Labels(labels.iter().map(Label::from).collect())
    }

    /// Clone the actual [Labels] with additional key-value labels
    pub fn clone_with_labels(
        &self,
        additional_labels: &[(
            impl Into<SharedString> + Clone,
            impl Into<SharedString> + Clone,
        )],
    ) -> Labels {
        let mut tags = self.0.clone();
        tags.extend(additional_labels.iter().map(Label::from));
        Labels(tags)
    }

    pub fn clone_with_label(
        &self,
        label: (
            impl Into<SharedString> + Clone,
            impl Into<SharedString> + Clone,
        ),
    ) -> Labels {
        self.clone_with_labels(&[label])
    }
}

impl IntoLabels for Labels {
    fn into_labels(self) -> Vec<Label> {
        self.0
    }
}
