//! Admin model -> record

use resq_core::entities::AdminRecord;

use crate::models::AdminModel;

impl From<AdminModel> for AdminRecord {
    fn from(model: AdminModel) -> Self {
        AdminRecord {
            uid: model.uid,
            // Only an explicit true grants access
            is_admin: model.is_admin == Some(true),
            name: model.name,
        }
    }
}
