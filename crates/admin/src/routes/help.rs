//! Help page route handler.
//!
//! Fully static content: a quick start guide, FAQ disclosures, and a
//! support contact card.

use askama::Template;
use axum::response::Html;
use tracing::instrument;

use crate::filters;

/// One step in the quick start guide.
#[derive(Debug, Clone, Copy)]
pub struct QuickStartStep {
    pub title: &'static str,
    pub description: &'static str,
}

/// One FAQ disclosure item.
#[derive(Debug, Clone, Copy)]
pub struct FaqItem {
    pub question: &'static str,
    pub answer: &'static str,
}

const QUICK_START: [QuickStartStep; 3] = [
    QuickStartStep {
        title: "Add the widget to your theme",
        description: "Go to Online Store → Themes → Customize → Product page → \
                      Add block → Eco Packaging",
    },
    QuickStartStep {
        title: "Configure your settings",
        description: "Set your discount percentage and estimated packaging cost \
                      in the Settings page",
    },
    QuickStartStep {
        title: "Start saving!",
        description: "Watch your dashboard as customers choose eco packaging and \
                      you save on materials",
    },
];

const FAQS: [FaqItem; 6] = [
    FaqItem {
        question: "How does eco packaging work?",
        answer: "When a customer adds items to their cart, they see an option to \
                 choose minimal packaging. If they select it, they get a discount \
                 (default 5%) and you save on packaging materials.",
    },
    FaqItem {
        question: "How is the discount applied?",
        answer: "The discount is automatically applied when the customer selects \
                 eco packaging. You can configure the discount percentage in \
                 Settings.",
    },
    FaqItem {
        question: "Where does the eco option appear?",
        answer: "The eco packaging toggle appears on product pages. You need to \
                 add the 'Eco Packaging' app block to your theme in the Theme \
                 Editor.",
    },
    FaqItem {
        question: "How do I add the widget to my theme?",
        answer: "Go to Online Store → Themes → Customize. Navigate to a product \
                 page, click 'Add block', and select 'Eco Packaging' from the app \
                 blocks.",
    },
    FaqItem {
        question: "How are savings calculated?",
        answer: "Savings = (Number of items in eco orders) × (Your packaging cost \
                 per item). You can set your packaging cost in Settings.",
    },
    FaqItem {
        question: "Can I see which customers chose eco packaging?",
        answer: "Yes! Go to the Orders page to see all orders with their \
                 packaging choice. You can filter by eco packaging only.",
    },
];

/// Support contact shown at the bottom of the page.
const SUPPORT_EMAIL: &str = "support@eco-packaging.app";

/// Help page template.
#[derive(Template)]
#[template(path = "help.html")]
pub struct HelpTemplate {
    pub current_path: String,
    pub steps: &'static [QuickStartStep],
    pub faqs: &'static [FaqItem],
    pub support_email: &'static str,
}

/// Help page handler.
#[instrument]
pub async fn index() -> Html<String> {
    let template = HelpTemplate {
        current_path: "/help".to_string(),
        steps: &QUICK_START,
        faqs: &FAQS,
        support_email: SUPPORT_EMAIL,
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_help_template_renders_guide_and_faq() {
        let template = HelpTemplate {
            current_path: "/help".to_string(),
            steps: &QUICK_START,
            faqs: &FAQS,
            support_email: SUPPORT_EMAIL,
        };

        let html = template.render().unwrap();
        assert!(html.contains("Quick Start Guide"));
        assert!(html.contains("How does eco packaging work?"));
        assert!(html.contains(SUPPORT_EMAIL));
        assert_eq!(
            html.matches("<details").count(),
            FAQS.len(),
            "every FAQ renders as a disclosure"
        );
    }
}
