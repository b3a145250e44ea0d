//! Design → SVG markup.
//!
//! The output mirrors what the browser canvas holds: a grid group, then one
//! group per layer (opacity 0 when hidden) containing slat `<line>` elements
//! tagged with their id and the `line` class, and cargo marker groups.

use slat_core::config::EditorConfig;
use slat_core::grid::grid_lines;
use slat_core::inventory::{Inventory, InventoryItem};
use slat_core::model::{Cargo, Design, Layer, Slat};

/// Width estimate of one bold glyph relative to the font size.
const GLYPH_ASPECT: f64 = 0.6;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the full scene at canvas size `width × height`.
pub fn render_svg(
    design: &Design,
    inventory: &Inventory,
    config: &EditorConfig,
    width: f64,
    height: f64,
) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    ));

    svg.push_str("<g id=\"grid\">\n");
    for gl in grid_lines(width, height, &config.grid) {
        let dash = gl
            .dash
            .map(|d| {
                format!(
                    " stroke-dasharray=\"{},{}\" stroke-dashoffset=\"{}\"",
                    d.dash, d.gap, d.offset
                )
            })
            .unwrap_or_default();
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#000\" stroke-width=\"{}\"{dash} />\n",
            gl.line.p0.x, gl.line.p0.y, gl.line.p1.x, gl.line.p1.y, gl.width
        ));
    }
    svg.push_str("</g>\n");

    for layer in design.layers() {
        render_layer(&mut svg, design, layer, inventory, config);
    }

    svg.push_str("</svg>");
    svg
}

fn render_layer(
    out: &mut String,
    design: &Design,
    layer: &Layer,
    inventory: &Inventory,
    config: &EditorConfig,
) {
    let opacity = if layer.visible { 1 } else { 0 };
    out.push_str(&format!(
        "<g id=\"{}\" data-layer-name=\"{}\" opacity=\"{opacity}\">\n",
        layer.group_id(),
        escape(&layer.name)
    ));
    for slat in design.slats_in_layer(layer.id) {
        render_slat(out, slat, config.pitch());
    }
    for cargo in design.cargo_in_layer(layer.id) {
        match inventory.get(cargo.item) {
            Some(item) => render_cargo(out, cargo, item, config.cargo_radius_px()),
            None => log::warn!("cargo {} refers to missing item {}", cargo.id, cargo.item),
        }
    }
    out.push_str("</g>\n");
}

fn render_slat(out: &mut String, slat: &Slat, pitch: f64) {
    let line = slat.line(pitch);
    out.push_str(&format!(
        "  <line id=\"{}\" class=\"line\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\" />\n",
        slat.dom_id(),
        line.p0.x,
        line.p0.y,
        line.p1.x,
        line.p1.y,
        slat.style.stroke.to_hex(),
        slat.style.width,
        slat.style.opacity
    ));
}

fn render_cargo(out: &mut String, cargo: &Cargo, item: &InventoryItem, radius: f64) {
    let (cx, cy) = (cargo.position.x, cargo.position.y);
    out.push_str(&format!(
        "  <g id=\"{}\" data-cargo-id=\"{}\">\n",
        cargo.dom_id(),
        item.id
    ));
    out.push_str(&format!(
        "    <circle data-cargo-component=\"circle\" cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"{}\" stroke=\"black\" />\n",
        item.marker_color().to_hex()
    ));
    out.push_str(&format!(
        "    <text data-cargo-component=\"text\" x=\"{cx}\" y=\"{cy}\" dominant-baseline=\"middle\" text-anchor=\"middle\" font-size=\"{}\" font-weight=\"bold\" fill=\"#FFFFFF\">{}</text>\n",
        fit_font_size(&item.tag, radius),
        escape(&item.tag)
    ));
    out.push_str("  </g>\n");
}

/// Shrink from `radius` in 10 % steps until the label fits in 1.5 × radius.
pub fn fit_font_size(label: &str, radius: f64) -> f64 {
    let chars = label.chars().count() as f64;
    let mut size = radius;
    while chars * GLYPH_ASPECT * size > radius * 1.5 && size > 0.5 {
        size *= 0.9;
    }
    size
}

/// Palette swatch for one inventory item: a `size × size` square with the
/// item's colored disc and tag.
pub fn render_cargo_swatch(item: &InventoryItem, size: f64) -> String {
    let radius = size * 0.33;
    let c = size / 2.0;
    let font_size = fit_font_size(&item.tag, radius);
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" pointer-events=\"none\">\n"
    ));
    svg.push_str(&format!("<title>{}</title>\n", escape(&item.name)));
    svg.push_str(&format!(
        "<circle cx=\"{c}\" cy=\"{c}\" r=\"{radius}\" fill=\"{}\" stroke=\"black\" />\n",
        item.marker_color().to_hex()
    ));
    svg.push_str(&format!(
        "<text x=\"{c}\" y=\"{c}\" dominant-baseline=\"middle\" text-anchor=\"middle\" font-family=\"Arial\" font-weight=\"bold\" font-size=\"{font_size}\" stroke=\"#000000\" stroke-width=\"{}\" fill=\"#FFFFFF\">{}</text>\n",
        radius / 20.0,
        escape(&item.tag)
    ));
    svg.push_str("</svg>");
    svg
}
