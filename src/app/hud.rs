use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::app::bodies::PlanetSpec;

/// The DOM side of the app: control containers, the tooltip, the sidebar
/// and the floating planet labels. Anchor elements must exist before
/// startup; missing ones fail initialization.
pub struct Hud {
    document: Document,
    sliders: Element,
    planet_data: Element,
    tooltip: HtmlElement,
    sidebar: Element,
    labels: Vec<HtmlElement>,
}

impl Hud {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let sliders = document.get_element_by_id("sliders").ok_or("No sliders container")?;
        let planet_data = document.get_element_by_id("planetData").ok_or("No planetData container")?;
        let tooltip = document.get_element_by_id("tooltip")
            .ok_or("No tooltip element")?
            .dyn_into::<HtmlElement>()?;
        let sidebar = document.get_element_by_id("sidebar").ok_or("No sidebar element")?;

        Ok(Hud {
            document: document.clone(),
            sliders,
            planet_data,
            tooltip,
            sidebar,
            labels: Vec::new(),
        })
    }

    /// Build the slider row, the sidebar info block and the floating label
    /// for one planet. Label order matches planet order.
    pub fn add_planet(&mut self, spec: &PlanetSpec) -> Result<(), JsValue> {
        let row = self.document.create_element("label")?;
        row.set_inner_html(&format!(
            "{}: <input type=\"range\" min=\"0\" max=\"0.05\" step=\"0.001\" value=\"{}\" data-name=\"{}\">",
            spec.name, spec.speed, spec.name
        ));
        self.sliders.append_child(&row)?;

        let entry = self.document.create_element("div")?;
        entry.set_inner_html(&format!(
            "<strong>{}</strong><br>Size: {}<br>Distance: {}<br>",
            spec.name, spec.size, spec.distance
        ));
        self.planet_data.append_child(&entry)?;

        let label = self.document.create_element("div")?.dyn_into::<HtmlElement>()?;
        label.set_class_name("planet-label");
        label.set_text_content(Some(spec.name));
        self.document.body().ok_or("No document body")?.append_child(&label)?;
        self.labels.push(label);

        Ok(())
    }

    pub fn place_label(&self, index: usize, x: f32, y: f32) {
        if let Some(label) = self.labels.get(index) {
            let _ = label
                .style()
                .set_property("transform", &format!("translate({}px,{}px)", x, y));
        }
    }

    pub fn show_tooltip(&self, text: &str, client_x: i32, client_y: i32) {
        self.tooltip.set_text_content(Some(text));
        let style = self.tooltip.style();
        let _ = style.set_property("top", &format!("{}px", client_y + 8));
        let _ = style.set_property("left", &format!("{}px", client_x + 8));
        let _ = self.tooltip.class_list().remove_1("hidden");
    }

    pub fn hide_tooltip(&self) {
        let _ = self.tooltip.class_list().add_1("hidden");
    }

    pub fn toggle_sidebar(&self) {
        let _ = self.sidebar.class_list().toggle("closed");
    }
}
