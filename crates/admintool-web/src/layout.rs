//! Page chrome shared by every HTML response.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use admintool_core::VERSION;
use admintool_core::context::Context;
use admintool_core::menu::TopMenu;

pub(crate) const SCRIPT: &str = "/assets/admin.js";

pub(crate) fn page(ctx: &Context, menu: &TopMenu, body: Markup) -> Markup {
    let title = if ctx.title.is_empty() {
        "Admin Tool".to_string()
    } else {
        format!("{} - Admin Tool", ctx.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                @if !ctx.stylesheet.is_empty() {
                    link rel="stylesheet" href=(ctx.stylesheet);
                }
                script src=(SCRIPT) defer {}
            }
            body class=(ctx.class_list()) {
                header {
                    (menu.render_nav())
                }
                main {
                    @if !ctx.breadcrumbs.is_empty() {
                        ol.breadcrumbs {
                            li { a href="/" { "Home" } }
                            @for crumb in &ctx.breadcrumbs {
                                li { a href=(crumb.url) { (crumb.title) } }
                            }
                        }
                    }
                    @if !ctx.title.is_empty() {
                        h1 { (ctx.title) }
                    }
                    @if !ctx.description.is_empty() {
                        div.route-description { (PreEscaped(&ctx.description)) }
                    }
                    (body)
                }
                footer {
                    span.version { "admintool " (VERSION) }
                }
            }
        }
    }
}
