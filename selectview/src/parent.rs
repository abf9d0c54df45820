//! Contract with the form that contains a field.

use crate::view::SelectView;

/// A containing form, notified after every committed value change.
///
/// Views hold their parent weakly, so the form owning its fields does not
/// create a reference cycle.
pub trait FieldParent: Send + Sync {
    fn update(&self, field: &SelectView);
}
