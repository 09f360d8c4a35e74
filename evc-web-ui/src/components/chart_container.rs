//! Frame for a rendered SVG chart with pointer tracking and a tooltip.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    pub id: String,
    /// Complete `<svg>` document to show
    pub svg: String,
    #[props(default = 800)]
    pub width: u32,
    #[props(default = 400)]
    pub height: u32,
    /// Tooltip lines for the hovered point; empty hides the tooltip
    #[props(default)]
    pub tooltip: Vec<String>,
    /// Horizontal pixel the tooltip is anchored to
    #[props(default)]
    pub tooltip_x: i32,
    /// Pointer x inside the chart, `None` when it leaves
    pub on_pointer: EventHandler<Option<i32>>,
}

#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let frame = format!(
        "position: relative; width: {}px; height: {}px;",
        props.width, props.height
    );
    let on_pointer = props.on_pointer;
    let tooltip_style = format!(
        "position: absolute; top: 40px; left: {}px; transform: translateX(-50%); pointer-events: none; \
         background: rgba(255,255,255,0.95); border: 1px solid #ccc; border-radius: 4px; padding: 6px 10px; \
         font-size: 12px; white-space: nowrap;",
        props.tooltip_x
    );

    rsx! {
        div {
            id: "{props.id}",
            style: "{frame}",
            div {
                style: "position: absolute; inset: 0;",
                dangerous_inner_html: "{props.svg}",
            }
            // Overlay so pointer coordinates are always relative to the chart.
            div {
                style: "position: absolute; inset: 0;",
                onmousemove: move |evt: MouseEvent| {
                    on_pointer.call(Some(evt.element_coordinates().x as i32));
                },
                onmouseleave: move |_| on_pointer.call(None),
            }
            if !props.tooltip.is_empty() {
                div {
                    style: "{tooltip_style}",
                    for (i, line) in props.tooltip.iter().enumerate() {
                        div {
                            key: "{i}",
                            style: if i == 0 { "font-weight: bold;" } else { "" },
                            "{line}"
                        }
                    }
                }
            }
        }
    }
}
