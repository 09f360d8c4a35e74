use dioxus::prelude::*;

const SPINNER_CSS: &str = "@keyframes evc-spin { to { transform: rotate(360deg); } }";

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    #[props(default = "Carregando pesquisas...".to_string())]
    pub message: String,
}

#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    rsx! {
        style { "{SPINNER_CSS}" }
        div {
            role: "status",
            style: "display: flex; gap: 10px; justify-content: center; align-items: center; padding: 40px; color: #555;",
            div {
                style: "width: 18px; height: 18px; border: 3px solid #E0E0E0; border-top-color: #1976D2; border-radius: 50%; animation: evc-spin 0.8s linear infinite;",
            }
            span { "{props.message}" }
        }
    }
}
