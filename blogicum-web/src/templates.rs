// Blogicum - A blog platform built with Rust
// Copyright (C) 2026 Blogicum Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use std::path::Path;
use tera::Tera;

use crate::template_engine::{register_extensions, TemplateEngine};

pub fn init_templates(templates_dir: &str, development_mode: bool) -> Result<TemplateEngine> {
    std::fs::create_dir_all(templates_dir).context("Failed to create templates directory")?;

    create_default_templates(templates_dir)?;

    TemplateEngine::new(templates_dir, development_mode)
}

/// Build a Tera instance from the built-in templates without touching disk
pub fn default_tera() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(DEFAULT_TEMPLATES.to_vec())
        .context("Failed to load built-in templates")?;
    register_extensions(&mut tera);
    Ok(tera)
}

/// Write any missing default template to disk; existing files are kept so
/// operators can customize them
fn create_default_templates(templates_dir: &str) -> Result<()> {
    let base_dir = Path::new(templates_dir);

    for (name, content) in DEFAULT_TEMPLATES {
        let path = base_dir.join(name);
        if path.exists() {
            continue;
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create template subdirectory")?;
        }

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to create template {}", name))?;
    }

    Ok(())
}

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}{{ site_title | default(value="Blogicum") }}{% endblock %}</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        nav {
            border-bottom: 1px solid #eee;
            padding-bottom: 10px;
            margin-bottom: 20px;
        }
        nav a {
            margin-right: 15px;
            text-decoration: none;
            color: #0066cc;
        }
        nav a:hover {
            text-decoration: underline;
        }
        .auth-info {
            float: right;
            font-size: 0.9em;
        }
        article.post-card {
            border-bottom: 1px solid #eee;
            padding-bottom: 15px;
            margin-bottom: 15px;
        }
        .post-meta {
            color: #666;
            font-size: 0.9em;
        }
        .draft-badge {
            color: #a00;
            font-size: 0.8em;
            border: 1px solid #a00;
            border-radius: 3px;
            padding: 0 5px;
            margin-left: 8px;
        }
        .pagination {
            margin-top: 20px;
        }
        .pagination a {
            margin-right: 10px;
        }
        .comment {
            border-left: 3px solid #eee;
            padding-left: 12px;
            margin-bottom: 12px;
        }
        .errors {
            color: #a00;
        }
        form div {
            margin-bottom: 15px;
        }
        input[type="text"], input[type="email"], input[type="password"],
        input[type="datetime-local"], textarea, select {
            width: 100%;
            max-width: 400px;
            padding: 5px;
        }
        textarea {
            min-height: 120px;
        }
        footer {
            margin-top: 40px;
            padding-top: 20px;
            border-top: 1px solid #eee;
            font-size: 0.9em;
            color: #666;
        }
    </style>
</head>
<body>
    <nav>
        <a href="/">Home</a>
        {% if user %}
            <a href="/posts/create/">New post</a>
            <span class="auth-info">
                <a href="/profile/{{ user.username }}/">{{ user.username }}</a> |
                <a href="/auth/logout/">Logout</a>
            </span>
        {% else %}
            <span class="auth-info">
                <a href="/auth/login/">Login</a> |
                <a href="/auth/registration/">Register</a>
            </span>
        {% endif %}
    </nav>

    <main>
        {% block content %}{% endblock %}
    </main>

    <footer>
        <p>Powered by Blogicum</p>
    </footer>
</body>
</html>"#;

const POST_CARD_TEMPLATE: &str = r#"<article class="post-card">
    <h2>
        <a href="/posts/{{ post.id }}/">{{ post.title }}</a>
        {% if not post.is_published %}<span class="draft-badge">unpublished</span>{% endif %}
    </h2>
    <p class="post-meta">
        {{ post.pub_date | date(format="%b %d, %Y %H:%M") }}
        by <a href="/profile/{{ post.author_username }}/">{{ post.author_username }}</a>
        {% if post.category_title %}
            in <a href="/category/{{ post.category_slug }}/">{{ post.category_title }}</a>
        {% endif %}
        &middot; {{ post.comment_count }} comment{{ post.comment_count | pluralize }}
    </p>
    {% if post.image %}
    <img src="/media/{{ post.image }}" alt="" style="max-width: 100%;">
    {% endif %}
    <div>{{ post.text | truncate(length=300) | markdown | safe }}</div>
</article>"#;

const PAGINATION_TEMPLATE: &str = r#"{% if paginator.total_pages > 1 %}
<div class="pagination">
    {% if paginator.has_previous %}
        <a href="?page={{ paginator.previous }}">&laquo; Previous</a>
    {% endif %}
    <span>Page {{ paginator.number }} of {{ paginator.total_pages }}</span>
    {% if paginator.has_next %}
        <a href="?page={{ paginator.next }}">Next &raquo;</a>
    {% endif %}
</div>
{% endif %}"#;

const INDEX_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}{{ super() }}{% endblock %}

{% block content %}
<h1>Latest posts</h1>

{% for post in posts %}
    {% include "includes/post_card.html" %}
{% else %}
    <p>No posts yet.</p>
{% endfor %}

{% include "includes/pagination.html" %}
{% endblock %}"#;

const CATEGORY_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}{{ category.title }} - {{ super() }}{% endblock %}

{% block content %}
<h1>{{ category.title }}</h1>
{% if category.description %}
<p>{{ category.description }}</p>
{% endif %}

{% for post in posts %}
    {% include "includes/post_card.html" %}
{% else %}
    <p>No posts in this category yet.</p>
{% endfor %}

{% include "includes/pagination.html" %}
{% endblock %}"#;

const PROFILE_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}{{ profile.username }} - {{ super() }}{% endblock %}

{% block content %}
<h1>{{ profile.username }}</h1>
{% if profile.first_name or profile.last_name %}
<p>{{ profile.first_name }} {{ profile.last_name }}</p>
{% endif %}

{% if user %}{% if user.id == profile.id %}
<p><a href="/edit_profile/">Edit profile</a></p>
{% endif %}{% endif %}

{% for post in posts %}
    {% include "includes/post_card.html" %}
{% else %}
    <p>No posts yet.</p>
{% endfor %}

{% include "includes/pagination.html" %}
{% endblock %}"#;

const PROFILE_EDIT_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}Edit profile - {{ super() }}{% endblock %}

{% block content %}
<h1>Edit profile</h1>

{% if errors %}
<ul class="errors">
    {% for field, message in errors %}
    <li>{{ message }}</li>
    {% endfor %}
</ul>
{% endif %}

<form method="post" action="/edit_profile/">
    <div>
        <label for="first_name">First name:</label><br>
        <input type="text" id="first_name" name="first_name" value="{{ form.first_name }}">
    </div>
    <div>
        <label for="last_name">Last name:</label><br>
        <input type="text" id="last_name" name="last_name" value="{{ form.last_name }}">
    </div>
    <div>
        <label for="email">Email:</label><br>
        <input type="email" id="email" name="email" value="{{ form.email }}" required>
    </div>
    <div>
        <label for="username">Username:</label><br>
        <input type="text" id="username" name="username" value="{{ form.username }}" required>
    </div>
    <div>
        <button type="submit">Save</button>
    </div>
</form>
{% endblock %}"#;

const DETAIL_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}{{ post.title }} - {{ super() }}{% endblock %}

{% block content %}
<article>
    <h1>
        {{ post.title }}
        {% if not post.is_published %}<span class="draft-badge">unpublished</span>{% endif %}
    </h1>
    <p class="post-meta">
        {{ post.pub_date | date(format="%b %d, %Y %H:%M") }}
        by <a href="/profile/{{ post.author_username }}/">{{ post.author_username }}</a>
        {% if post.category %}
            in <a href="/category/{{ post.category.slug }}/">{{ post.category.title }}</a>
        {% endif %}
    </p>

    {% if can_edit or can_delete %}
    <p>
        {% if can_edit %}<a href="/posts/{{ post.id }}/edit/">Edit</a>{% endif %}
        {% if can_delete %}<a href="/posts/{{ post.id }}/delete/">Delete</a>{% endif %}
    </p>
    {% endif %}

    {% if post.image %}
    <img src="/media/{{ post.image }}" alt="" style="max-width: 100%;">
    {% endif %}

    <div>{{ post.text | markdown | safe }}</div>
</article>

<section>
    <h2>Comments ({{ comments | length }})</h2>

    {% for comment in comments %}
    <div class="comment">
        <p class="post-meta">
            <a href="/profile/{{ comment.author_username }}/">{{ comment.author_username }}</a>
            &middot; {{ comment.created_at | date(format="%b %d, %Y %H:%M") }}
            {% if user %}{% if user.id == comment.author_id %}
                &middot; <a href="/posts/{{ post.id }}/edit_comment/{{ comment.id }}/">Edit</a>
                <a href="/posts/{{ post.id }}/delete_comment/{{ comment.id }}/">Delete</a>
            {% endif %}{% endif %}
        </p>
        <div>{{ comment.text | markdown | safe }}</div>
    </div>
    {% else %}
    <p>No comments yet.</p>
    {% endfor %}

    {% if user %}
    <form method="post" action="/posts/{{ post.id }}/comment/">
        <div>
            <label for="text">Add a comment:</label><br>
            <textarea id="text" name="text" required>{{ form.text }}</textarea>
        </div>
        <div>
            <button type="submit">Post comment</button>
        </div>
    </form>
    {% else %}
    <p><a href="/auth/login/">Log in</a> to leave a comment.</p>
    {% endif %}
</section>
{% endblock %}"#;

const POST_FORM_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}{% if editing %}Edit post{% else %}New post{% endif %} - {{ super() }}{% endblock %}

{% block content %}
<h1>{% if editing %}Edit post{% else %}New post{% endif %}</h1>

{% if errors %}
<ul class="errors">
    {% for field, message in errors %}
    <li>{{ message }}</li>
    {% endfor %}
</ul>
{% endif %}

<form method="post" enctype="multipart/form-data"
      action="{% if editing %}/posts/{{ post_id }}/edit/{% else %}/posts/create/{% endif %}">
    <div>
        <label for="title">Title:</label><br>
        <input type="text" id="title" name="title" value="{{ form.title }}" required>
    </div>
    <div>
        <label for="text">Text:</label><br>
        <textarea id="text" name="text" required>{{ form.text }}</textarea>
    </div>
    <div>
        <label for="pub_date">Publication date (leave empty for now):</label><br>
        <input type="datetime-local" id="pub_date" name="pub_date" value="{{ form.pub_date }}">
    </div>
    <div>
        <label for="category">Category:</label><br>
        <select id="category" name="category">
            <option value="">---------</option>
            {% for category in categories %}
            <option value="{{ category.id }}"
                {% if form.category_id == category.id %}selected{% endif %}>
                {{ category.title }}
            </option>
            {% endfor %}
        </select>
    </div>
    <div>
        <label for="image">Image:</label><br>
        <input type="file" id="image" name="image" accept="image/*">
    </div>
    <div>
        <button type="submit">Save</button>
    </div>
</form>
{% endblock %}"#;

const POST_CONFIRM_DELETE_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}Delete post - {{ super() }}{% endblock %}

{% block content %}
<h1>Delete post</h1>
<p>You are about to delete "{{ post.title }}". This cannot be undone.</p>

<form method="post" action="/posts/{{ post.id }}/delete/">
    <button type="submit">Delete</button>
    <a href="/posts/{{ post.id }}/">Cancel</a>
</form>
{% endblock %}"#;

const COMMENT_FORM_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}{% if comment_id %}Edit comment{% else %}Add comment{% endif %} - {{ super() }}{% endblock %}

{% block content %}
<h1>{% if comment_id %}Edit comment{% else %}Add comment{% endif %}</h1>

{% if errors %}
<ul class="errors">
    {% for field, message in errors %}
    <li>{{ message }}</li>
    {% endfor %}
</ul>
{% endif %}

<form method="post"
      action="{% if comment_id %}/posts/{{ post_id }}/edit_comment/{{ comment_id }}/{% else %}/posts/{{ post_id }}/comment/{% endif %}">
    <div>
        <label for="text">Comment:</label><br>
        <textarea id="text" name="text" required>{{ form.text }}</textarea>
    </div>
    <div>
        <button type="submit">Save</button>
        <a href="/posts/{{ post_id }}/">Cancel</a>
    </div>
</form>
{% endblock %}"#;

const COMMENT_CONFIRM_DELETE_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}Delete comment - {{ super() }}{% endblock %}

{% block content %}
<h1>Delete comment</h1>
<div class="comment">
    <div>{{ comment.text | markdown | safe }}</div>
</div>

<form method="post" action="/posts/{{ post_id }}/delete_comment/{{ comment.id }}/">
    <button type="submit">Delete</button>
    <a href="/posts/{{ post_id }}/">Cancel</a>
</form>
{% endblock %}"#;

const LOGIN_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}Login - {{ super() }}{% endblock %}

{% block content %}
<h1>Login</h1>

{% if error %}
<p class="errors">{{ error }}</p>
{% endif %}

<form method="post" action="/auth/login/">
    <div>
        <label for="username">Username or Email:</label><br>
        <input type="text" id="username" name="username" value="{{ username | default(value="") }}" required>
    </div>
    <div>
        <label for="password">Password:</label><br>
        <input type="password" id="password" name="password" required>
    </div>
    <div>
        <button type="submit">Login</button>
    </div>
</form>

<p>No account yet? <a href="/auth/registration/">Register</a>.</p>
{% endblock %}"#;

const REGISTRATION_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}Register - {{ super() }}{% endblock %}

{% block content %}
<h1>Register</h1>

{% if errors %}
<ul class="errors">
    {% for field, message in errors %}
    <li>{{ message }}</li>
    {% endfor %}
</ul>
{% endif %}

<form method="post" action="/auth/registration/">
    <div>
        <label for="username">Username:</label><br>
        <input type="text" id="username" name="username" value="{{ form.username }}" required>
    </div>
    <div>
        <label for="email">Email:</label><br>
        <input type="email" id="email" name="email" value="{{ form.email }}" required>
    </div>
    <div>
        <label for="password">Password:</label><br>
        <input type="password" id="password" name="password" required>
    </div>
    <div>
        <label for="password_confirm">Confirm password:</label><br>
        <input type="password" id="password_confirm" name="password_confirm" required>
    </div>
    <div>
        <button type="submit">Register</button>
    </div>
</form>
{% endblock %}"#;

const ERROR_TEMPLATE: &str = r#"{% extends "base.html" %}

{% block title %}Error - {{ super() }}{% endblock %}

{% block content %}
<h1>{{ error_title | default(value="Error") }}</h1>
<p>{{ error_message | default(value="An error occurred") }}</p>
<p><a href="/">Return to homepage</a></p>
{% endblock %}"#;

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", BASE_TEMPLATE),
    ("includes/post_card.html", POST_CARD_TEMPLATE),
    ("includes/pagination.html", PAGINATION_TEMPLATE),
    ("index.html", INDEX_TEMPLATE),
    ("category.html", CATEGORY_TEMPLATE),
    ("profile.html", PROFILE_TEMPLATE),
    ("profile_edit.html", PROFILE_EDIT_TEMPLATE),
    ("detail.html", DETAIL_TEMPLATE),
    ("post_form.html", POST_FORM_TEMPLATE),
    ("post_confirm_delete.html", POST_CONFIRM_DELETE_TEMPLATE),
    ("comment_form.html", COMMENT_FORM_TEMPLATE),
    ("comment_confirm_delete.html", COMMENT_CONFIRM_DELETE_TEMPLATE),
    ("login.html", LOGIN_TEMPLATE),
    ("registration.html", REGISTRATION_TEMPLATE),
    ("error.html", ERROR_TEMPLATE),
];

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn test_default_tera_loads_all_templates() {
        let tera = default_tera().unwrap();

        for (name, _) in DEFAULT_TEMPLATES {
            assert!(
                tera.get_template_names().any(|n| n == *name),
                "missing template {}",
                name
            );
        }
    }

    #[test]
    fn test_login_template_renders_without_user() {
        let tera = default_tera().unwrap();
        let mut context = Context::new();
        context.insert("site_title", "Blogicum");

        let html = tera.render("login.html", &context).unwrap();
        assert!(html.contains("Login"));
        assert!(html.contains("/auth/registration/"));
    }

    #[test]
    fn test_error_template_renders_defaults() {
        let tera = default_tera().unwrap();
        let html = tera.render("error.html", &Context::new()).unwrap();
        assert!(html.contains("An error occurred"));
    }

    #[test]
    fn test_init_templates_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let templates_dir = dir.path().to_string_lossy().to_string();

        let engine = init_templates(&templates_dir, false).unwrap();

        assert!(dir.path().join("base.html").exists());
        assert!(dir.path().join("includes/post_card.html").exists());

        let mut context = Context::new();
        context.insert("site_title", "Blogicum");
        assert!(engine.render("login.html", &context).is_ok());
    }

    #[test]
    fn test_init_templates_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let templates_dir = dir.path().to_string_lossy().to_string();
        std::fs::write(dir.path().join("error.html"), "custom error page").unwrap();

        init_templates(&templates_dir, false).unwrap();

        let content = std::fs::read_to_string(dir.path().join("error.html")).unwrap();
        assert_eq!(content, "custom error page");
    }
}
