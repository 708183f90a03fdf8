// app/src/web/views.rs

//! Server-rendered pages. Every value that came from a user goes through `escape`.

use catalog::Product;
use std::fmt::Write;

pub const DEFAULT_SITE_NAME: &str = "Product Catalog";

/// Values shown in the create and edit forms.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
  pub id: Option<String>,
  pub name: String,
  pub description: String,
  pub image: Option<String>,
}

impl From<&Product> for ProductForm {
  fn from(product: &Product) -> Self {
    Self {
      id: Some(product.id.to_string()),
      name: product.name.clone(),
      description: product.description.clone(),
      image: product.image.clone(),
    }
  }
}

pub fn escape(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      _ => out.push(c),
    }
  }
  out
}

fn layout(site: &str, title: &str, body: &str) -> String {
  format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} | {site}</title>
</head>
<body>
  <header>
    <nav>
      <a href="/">{site}</a>
      <a href="/create">Add product</a>
      <a href="/about">About</a>
      <a href="/contact">Contact</a>
    </nav>
  </header>
  <main>
    <h1>{title}</h1>
{body}
  </main>
</body>
</html>
"#,
    site = escape(site),
    title = escape(title),
    body = body
  )
}

pub fn home(site: &str, products: &[Product]) -> String {
  let mut body = String::new();
  if products.is_empty() {
    body.push_str("    <p class=\"empty\">No products yet. <a href=\"/create\">Add the first one</a>.</p>\n");
  } else {
    body.push_str("    <ul class=\"products\">\n");
    for product in products {
      let image = match &product.image {
        Some(name) => format!("<img src=\"/uploads/{}\" alt=\"{}\">", escape(name), escape(&product.name)),
        None => "<div class=\"no-image\">No image</div>".to_string(),
      };
      let _ = write!(
        body,
        "      <li>\n        {image}\n        <h2>{name}</h2>\n        <p>{description}</p>\n        <small>Added {created}</small>\n        <a href=\"/edit/{id}\">Edit</a>\n        <a href=\"/delete/{id}\" onclick=\"return confirm('Delete this product?')\">Delete</a>\n      </li>\n",
        image = image,
        name = escape(&product.name),
        description = escape(&product.description),
        created = product.created_at.format("%Y-%m-%d %H:%M"),
        id = product.id,
      );
    }
    body.push_str("    </ul>\n");
  }
  layout(site, "Products", &body)
}

fn form_body(action: &str, form: &ProductForm, error: Option<&str>, submit: &str) -> String {
  let mut body = String::new();
  if let Some(message) = error {
    let _ = writeln!(body, "    <p class=\"error\" role=\"alert\">{}</p>", escape(message));
  }
  let _ = writeln!(
    body,
    "    <form action=\"{}\" method=\"post\" enctype=\"multipart/form-data\">",
    escape(action)
  );
  let _ = writeln!(
    body,
    "      <label>Name <input type=\"text\" name=\"name\" value=\"{}\" required></label>",
    escape(&form.name)
  );
  let _ = writeln!(
    body,
    "      <label>Description <textarea name=\"description\" required>{}</textarea></label>",
    escape(&form.description)
  );
  if let Some(image) = &form.image {
    let _ = writeln!(
      body,
      "      <img src=\"/uploads/{0}\" alt=\"Current image\">\n      <input type=\"hidden\" name=\"oldImage\" value=\"{0}\">",
      escape(image)
    );
  }
  body.push_str(
    "      <label>Image <input type=\"file\" name=\"image\" accept=\".jpg,.jpeg,.png,.gif\"></label>\n      <small>jpeg, jpg, png or gif, up to 5 MiB</small>\n",
  );
  let _ = writeln!(body, "      <button type=\"submit\">{}</button>", escape(submit));
  body.push_str("      <a href=\"/\">Cancel</a>\n    </form>\n");
  body
}

pub fn create_form(site: &str, form: &ProductForm, error: Option<&str>) -> String {
  layout(site, "Add product", &form_body("/create", form, error, "Create"))
}

pub fn edit_form(site: &str, form: &ProductForm, error: Option<&str>) -> String {
  let action = format!("/edit/{}", form.id.as_deref().unwrap_or_default());
  layout(site, "Edit product", &form_body(&action, form, error, "Save changes"))
}

pub fn error_page(site: &str, message: &str) -> String {
  let body = format!(
    "    <p class=\"error\">{}</p>\n    <a href=\"/\">Back to the product list</a>\n",
    escape(message)
  );
  layout(site, "Error", &body)
}

pub fn about(site: &str) -> String {
  let body = format!(
    "    <p>{} keeps track of our products: their names, descriptions and pictures.</p>\n",
    escape(site)
  );
  layout(site, "About us", &body)
}

pub fn contact(site: &str) -> String {
  layout(
    site,
    "Contact us",
    "    <p>Questions about a product? Reach the catalog team at <a href=\"mailto:catalog@example.com\">catalog@example.com</a>.</p>\n",
  )
}
