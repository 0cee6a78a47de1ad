use leptos::prelude::*;

use crate::pages::Page;

const LINKS: &[(&str, &str)] = &[
    ("/optimization", "Optimization"),
    ("/contracts", "Contracts"),
    ("/pricing", "Pricing"),
    ("/products", "Products"),
];

/// Top navigation; the link of the current page is highlighted
#[component]
pub fn PageNav(page: Page) -> impl IntoView {
    let active = page.section();
    view! {
        <header class="page-nav">
            <span class="brand">"Tierdesk"</span>
            <nav>
                {LINKS
                    .iter()
                    .map(|(href, label)| {
                        let class = if *href == active { "nav-link active" } else { "nav-link" };
                        view! { <a href=*href class=class>{*label}</a> }
                    })
                    .collect_view()}
            </nav>
        </header>
    }
}
