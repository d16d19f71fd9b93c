use std::net::IpAddr;

use anyhow::Result;
use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::api::{Resource, ResourceApi};
use crate::model::Device;
use crate::tui::choice::ChoiceList;
use crate::tui::editor::FieldEditor;
use crate::tui::intent::{DynamicView, Intent, MainAction, RESOURCE_ACTIONS, View};
use crate::tui::main_menu::MainMenu;
use crate::tui::resource_data::{DataField, ResourceData};
use crate::tui::table::DataTable;

use super::{DynamicContent, Panes, SubModel, ViewerContent, apply_shared};

pub const UID: &str = "Uid";
pub const IPMI_IP: &str = "IPMI IP";
pub const MODEL: &str = "Model";
pub const CREDS: &str = "Creds";
pub const ZOMBIE: &str = "Zombie";

/// Creds choice meaning "use the service's default credentials".
pub const DEFAULT_CREDS: &str = "default";

const COLUMNS: &[&str] = &["Uid", "IPMI IP", "Creds", "Model", "Zombie"];

fn row_cells(device: &Device) -> Vec<String> {
    vec![
        device.uid.clone(),
        device.ipmi_ip.clone(),
        device.creds_name.clone(),
        device.model.clone(),
        device.zombie.to_string(),
    ]
}

fn ip_address(value: &str) -> Result<(), String> {
    if value.is_empty() || value.parse::<IpAddr>().is_ok() {
        Ok(())
    } else {
        Err(format!("'{value}' is not an IP address"))
    }
}

fn cred_options(names: Vec<String>) -> Vec<String> {
    std::iter::once(DEFAULT_CREDS.to_string())
        .chain(names.into_iter().filter(|n| n != DEFAULT_CREDS))
        .collect()
}

pub struct DeviceModel {
    panes: Panes,
    device: Device,
    uid_input: FieldEditor,
    ip_input: FieldEditor,
    model_input: FieldEditor,
    creds_choice: ChoiceList,
    table: DataTable<Device>,
}

impl DeviceModel {
    pub fn new(api: &dyn ResourceApi) -> Self {
        let data = ResourceData::new(
            "Device",
            vec![
                DataField::editable(UID),
                DataField::editable(IPMI_IP),
                DataField::editable(MODEL),
                DataField::editable(CREDS),
                DataField::toggle(ZOMBIE, false),
            ],
        );
        let mut model = Self {
            panes: Panes::new(
                MainMenu::new("Device Actions", RESOURCE_ACTIONS, MainAction::ShowYaml),
                data,
                View::Viewer,
            ),
            device: Device::default(),
            uid_input: FieldEditor::new("Enter Device UID:", ""),
            ip_input: FieldEditor::new("Enter IPMI IP:", "").with_validator(ip_address),
            model_input: FieldEditor::new("Enter Device Model:", ""),
            creds_choice: ChoiceList::new("Choose Creds:", cred_options(Vec::new())),
            table: DataTable::new(COLUMNS, row_cells),
        };
        model.sync_data();
        model.refresh(api);
        model.update_cred_names(api);
        model
    }

    #[cfg(test)]
    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn refresh(&mut self, api: &dyn ResourceApi) {
        match api.fetch_devices() {
            Ok(devices) => self.table.set_items(devices),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    /// Reload the creds choices after credentials were saved.
    pub fn update_cred_names(&mut self, api: &dyn ResourceApi) {
        match api.fetch_cred_names() {
            Ok(names) => self.creds_choice.set_options(cred_options(names)),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    pub fn edit_uid(&mut self, uid: &str, api: &dyn ResourceApi) {
        match api.fetch_device(uid) {
            Ok(device) => self.load(device),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    fn load(&mut self, device: Device) {
        self.device = Device {
            uid: device.uid,
            ipmi_ip: device.ipmi_ip,
            creds_name: device.creds_name,
            model: device.model,
            zombie: device.zombie,
            ..Device::default()
        };
        self.uid_input.set_value(&self.device.uid);
        self.ip_input.set_value(&self.device.ipmi_ip);
        self.model_input.set_value(&self.device.model);
        let label = self.creds_label().to_string();
        self.creds_choice.set_value(&label);
        self.sync_data();
        self.panes.view = View::Data;
    }

    fn creds_label(&self) -> &str {
        if self.device.creds_name.is_empty() {
            DEFAULT_CREDS
        } else {
            &self.device.creds_name
        }
    }

    fn sync_data(&mut self) {
        let creds = self.creds_label().to_string();
        let data = &mut self.panes.data;
        data.set_value(UID, self.device.uid.clone());
        data.set_value(IPMI_IP, self.device.ipmi_ip.clone());
        data.set_value(MODEL, self.device.model.clone());
        data.set_value(CREDS, creds);
        data.set_value(ZOMBIE, self.device.zombie.to_string());
    }

    fn exit_field(&mut self, field: &'static str, save: bool) {
        match (field, save) {
            (UID, true) => self.device.uid = self.uid_input.value(),
            (UID, false) => self.uid_input.set_value(&self.device.uid),
            (IPMI_IP, true) => self.device.ipmi_ip = self.ip_input.value(),
            (IPMI_IP, false) => self.ip_input.set_value(&self.device.ipmi_ip),
            (MODEL, true) => self.device.model = self.model_input.value(),
            (MODEL, false) => self.model_input.set_value(&self.device.model),
            (CREDS, true) => {
                self.device.creds_name = match self.creds_choice.value() {
                    Some(DEFAULT_CREDS) | None => String::new(),
                    Some(name) => name.to_string(),
                };
            }
            (CREDS, false) => {
                let label = self.creds_label().to_string();
                self.creds_choice.set_value(&label);
            }
            _ => {}
        }
        self.sync_data();
    }
}

impl SubModel for DeviceModel {
    fn resource(&self) -> Resource {
        Resource::Device
    }

    fn panes(&self) -> &Panes {
        &self.panes
    }

    fn panes_mut(&mut self) -> &mut Panes {
        &mut self.panes
    }

    fn document(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.device)?)
    }

    fn apply(&mut self, intent: Intent, api: &dyn ResourceApi) -> Vec<Intent> {
        match intent {
            Intent::ExitDynamicView { save } => match self.panes.dynamic {
                Some(DynamicView::Field(field)) => {
                    self.exit_field(field, save);
                    self.panes.close();
                }
                _ => return apply_shared(self, intent, api),
            },
            Intent::UpdateToggleValue {
                name: ZOMBIE,
                value,
            } => self.device.zombie = value,
            Intent::ApplyMainAction(MainAction::ClearFields) => {
                self.load(Device::default());
            }
            Intent::EditItem => {
                if let Some(device) = self.table.current().cloned() {
                    self.load(device);
                }
            }
            Intent::RefreshData => self.refresh(api),
            Intent::UpdateCredNames => self.update_cred_names(api),
            other => return apply_shared(self, other, api),
        }
        Vec::new()
    }

    fn field_key(&mut self, field: &'static str, key: KeyEvent) -> Vec<Intent> {
        let intent = match field {
            UID => self.uid_input.handle_key(key),
            IPMI_IP => self.ip_input.handle_key(key),
            MODEL => self.model_input.handle_key(key),
            CREDS => self.creds_choice.handle_key(key),
            _ => None,
        };
        intent.into_iter().collect()
    }

    fn viewer_key(&mut self, key: KeyEvent) -> Vec<Intent> {
        self.table.handle_key(key).into_iter().collect()
    }

    fn field_content(&self, field: &'static str) -> DynamicContent<'_> {
        match field {
            UID => DynamicContent::Editor(&self.uid_input),
            IPMI_IP => DynamicContent::Editor(&self.ip_input),
            MODEL => DynamicContent::Editor(&self.model_input),
            CREDS => DynamicContent::Choice(&self.creds_choice),
            _ => DynamicContent::Empty,
        }
    }

    fn viewer_content(&self) -> ViewerContent<'_> {
        ViewerContent::Table(self.table.view())
    }

    fn resize(&mut self, viewer_rows: usize, dynamic_rows: usize) {
        self.table.set_page_size(viewer_rows.saturating_sub(1));
        self.panes.yaml_preview.set_height(dynamic_rows);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::model::Cred;
    use crate::tui::testing::{FakeApi, key, type_str};

    fn api() -> FakeApi {
        FakeApi {
            devices: vec![Device {
                uid: "web-01".into(),
                ipmi_ip: "10.0.0.5".into(),
                creds_name: "bmc".into(),
                model: "x1".into(),
                ..Device::default()
            }]
            .into(),
            creds: vec![Cred {
                name: "bmc".into(),
                ..Cred::default()
            }]
            .into(),
            ..FakeApi::default()
        }
    }

    fn press(model: &mut DeviceModel, api: &FakeApi, k: KeyEvent) {
        for intent in model.handle_key(k) {
            model.apply(intent, api);
        }
    }

    #[test]
    fn default_creds_maps_to_empty_name() {
        let api = api();
        let mut model = DeviceModel::new(&api);
        model.edit_uid("web-01", &api);
        assert_eq!(model.panes().data.value(CREDS), "bmc");

        model.apply(Intent::SetDynamicView(DynamicView::Field(CREDS)), &api);
        press(&mut model, &api, key(KeyCode::Up));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.device().creds_name, "");
        assert_eq!(model.panes().data.value(CREDS), DEFAULT_CREDS);
        let doc = model.document().unwrap();
        assert!(doc.get("creds_name").is_none(), "{doc}");
    }

    #[test]
    fn ipmi_ip_must_parse() {
        let api = api();
        let mut model = DeviceModel::new(&api);
        model.apply(Intent::SetDynamicView(DynamicView::Field(IPMI_IP)), &api);
        type_str(|k| press(&mut model, &api, k), "10.0.0");
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.panes().view, View::Dynamic);
        type_str(|k| press(&mut model, &api, k), ".9");
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.device().ipmi_ip, "10.0.0.9");
    }

    #[test]
    fn cred_names_refresh_keeps_default_first() {
        let api = api();
        let mut model = DeviceModel::new(&api);
        api.creds.borrow_mut().push(Cred {
            name: "ilo".into(),
            ..Cred::default()
        });
        model.apply(Intent::UpdateCredNames, &api);
        let DynamicContent::Choice(list) = model.field_content(CREDS) else {
            panic!("creds is a choice list");
        };
        assert_eq!(list.options(), ["default", "bmc", "ilo"]);
    }

    #[test]
    fn zombie_toggle_updates_device() {
        let api = api();
        let mut model = DeviceModel::new(&api);
        model.apply(
            Intent::UpdateToggleValue {
                name: ZOMBIE,
                value: true,
            },
            &api,
        );
        assert!(model.device().zombie);
    }
}
