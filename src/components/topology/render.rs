use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::TopologyView;
use super::style::{
	BACKGROUND, BOTTLENECK_COLOR, EDGE_COLOR, NODE_BORDER, edge_width, node_color, node_radius,
	rgba,
};
use super::surface::RenderSurface;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(view: &TopologyView, ctx: &CanvasRenderingContext2d) {
	let surface = view.surface();
	let vp = surface.viewport();
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, surface.width, surface.height);
	ctx.save();
	let _ = ctx.translate(vp.pan.x, vp.pan.y);
	let _ = ctx.scale(vp.zoom, vp.zoom);
	draw_edges(view, ctx);
	draw_nodes(view, ctx);
	ctx.restore();
	draw_tooltip(view, ctx);
}

fn draw_edges(view: &TopologyView, ctx: &CanvasRenderingContext2d) {
	let model = &view.surface().model;
	let k = view.surface().viewport().zoom;
	let (dash, gap, arrow_size) = (8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(view.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(view.hover.highlight_t);

	for edge in model.edges() {
		let (Some(a), Some(b)) = (
			model.node(&edge.record.source),
			model.node(&edge.record.target),
		) else {
			continue;
		};
		let (Some(pa), Some(pb)) = (a.position, b.position) else {
			continue;
		};
		let (dx, dy) = (pb.x - pa.x, pb.y - pa.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ra, rb) = (node_radius(a.record.load), node_radius(b.record.load));

		let is_highlighted = view.is_edge_hovered(&edge.record.id)
			|| (view.is_highlighted(&edge.record.source) && view.is_highlighted(&edge.record.target));
		let base_width = edge_width(edge.bottleneck) / k;
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, base_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, base_width * (1.0 - 0.3 * t))
		};
		let color = if edge.bottleneck {
			BOTTLENECK_COLOR
		} else {
			EDGE_COLOR
		};

		ctx.set_stroke_style_str(&rgba(color, edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(pa.x + ux * ra, pa.y + uy * ra);
		ctx.line_to(pb.x - ux * (rb + arrow_size), pb.y - uy * (rb + arrow_size));
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&rgba(color, arrow_alpha));
		let (tip_x, tip_y) = (pb.x - ux * rb, pb.y - uy * rb);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(view: &TopologyView, ctx: &CanvasRenderingContext2d) {
	let model = &view.surface().model;
	let (has_highlight, t, k) = (
		view.has_active_highlight(),
		ease_out_cubic(view.hover.highlight_t),
		view.surface().viewport().zoom,
	);

	// dimmed pass first so highlighted nodes draw on top
	for highlighted_pass in [false, true] {
		if highlighted_pass && !has_highlight {
			break;
		}
		for node in model.nodes() {
			let Some(pos) = node.position else {
				continue;
			};
			let id = &node.record.id;
			let highlighted = has_highlight && view.is_highlighted(id);
			if highlighted != highlighted_pass {
				continue;
			}
			let base = node_radius(node.record.load);
			let is_hovered = view.is_hovered(id);
			let (alpha, radius) = if highlighted {
				let grow = if is_hovered { 0.35 } else { 0.2 };
				(1.0, base * (1.0 + grow * t))
			} else {
				(1.0 - 0.7 * t, base * (1.0 - 0.15 * t))
			};

			if highlighted && t > 0.01 {
				let glow_radius = radius * if is_hovered { 1.8 } else { 1.4 };
				if let Ok(gradient) =
					ctx.create_radial_gradient(pos.x, pos.y, radius * 0.3, pos.x, pos.y, glow_radius)
				{
					let glow = if is_hovered { 0.35 * t } else { 0.2 * t };
					let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", glow));
					let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
					ctx.begin_path();
					let _ = ctx.arc(pos.x, pos.y, glow_radius, 0.0, 2.0 * PI);
					#[allow(deprecated)]
					ctx.set_fill_style(&gradient);
					ctx.fill();
				}
			}

			ctx.set_global_alpha(alpha);
			ctx.begin_path();
			let _ = ctx.arc(pos.x, pos.y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(node_color(node.record.status));
			ctx.fill();
			ctx.set_stroke_style_str(NODE_BORDER);
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
			ctx.set_global_alpha(1.0);

			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.9));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(node.record.display_label(), pos.x + radius + 3.0, pos.y + 3.0);
		}
	}
}

fn draw_tooltip(view: &TopologyView, ctx: &CanvasRenderingContext2d) {
	let Some(tip) = view.tooltip() else {
		return;
	};
	let (x, y) = (view.hover.pointer.0 + 12.0, view.hover.pointer.1 + 12.0);
	let line_h = 16.0;
	let height = 10.0 + line_h * (tip.rows.len() + 1) as f64;
	let width = 190.0;

	ctx.set_fill_style_str("rgba(20, 24, 40, 0.92)");
	ctx.fill_rect(x, y, width, height);
	ctx.set_stroke_style_str("rgba(136, 153, 204, 0.6)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, width, height);

	ctx.set_fill_style_str("white");
	ctx.set_font("bold 12px sans-serif");
	let _ = ctx.fill_text(&tip.title, x + 8.0, y + line_h);
	ctx.set_font("11px sans-serif");
	for (i, (label, value)) in tip.rows.iter().enumerate() {
		let _ = ctx.fill_text(
			&format!("{label}: {value}"),
			x + 8.0,
			y + line_h * (i + 2) as f64,
		);
	}
}
