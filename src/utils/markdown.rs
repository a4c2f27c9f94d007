use ammonia::Builder;
use std::borrow::Cow;
use maplit::{hashmap, hashset};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CodeBlockKind, Event, LinkType, Options, Parser, Tag};
use regex::Regex;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`]*`").unwrap());
static MARKDOWN_SYNTAX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*_\-\[\]()]").unwrap());
static CJK_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{4e00}-\x{9fa5}]").unwrap());
static LATIN_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\''];
static BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[A-Za-z0-9][A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]*").unwrap()
});

/// 中文阅读速度（字/分钟）
pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Clone)]
pub struct MarkdownProcessor {}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        Self {}
    }

    fn get_sanitizer() -> Builder<'static> {
        // 配置 HTML 清理器
        let mut sanitizer = Builder::default();

        // 允许的标签
        sanitizer.tags(hashset![
            "h1", "h2", "h3", "h4", "h5", "h6",
            "p", "br", "hr",
            "strong", "em", "u", "s", "del", "code",
            "pre", "blockquote",
            "ul", "ol", "li",
            "a", "img",
            "table", "thead", "tbody", "tr", "th", "td",
            "div", "span",
            "sup", "sub",
            "input"
        ]);

        // rel 由 ammonia 统一追加，不能出现在允许列表中
        sanitizer.tag_attributes(hashmap![
            "a" => hashset!["href", "title", "target"],
            "img" => hashset!["src", "alt", "title", "width", "height"],
            "pre" => hashset!["class"],
            "code" => hashset!["class"],
            "div" => hashset!["class", "id"],
            "span" => hashset!["class"],
            "sup" => hashset!["class"],
            "input" => hashset!["type", "checked", "disabled"],
            "th" => hashset!["style"],
            "td" => hashset!["style"],
        ]);

        // 只保留任务列表的复选框
        sanitizer.attribute_filter(|element, attribute, value| match (element, attribute) {
            ("input", "type") if value != "checkbox" => None,
            _ => Some(Cow::Borrowed(value)),
        });
        sanitizer
    }

    /// 将 Markdown 转换为 HTML
    pub fn to_html(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        let parser = Parser::new_ext(markdown, options);

        // 处理代码块语法高亮，再把裸链接转换为链接
        let events = Self::linkify(self.highlight_code_blocks(parser));

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Self::get_sanitizer().clean(&html_output).to_string()
    }

    /// 从 Markdown 提取纯文本（用于摘要），跳过代码块
    pub fn to_text(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Options::empty());

        let mut text = String::new();
        let mut in_code_block = false;
        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::End(Tag::CodeBlock(_)) => {
                    in_code_block = false;
                    text.push(' ');
                }
                Event::Text(t) if !in_code_block => text.push_str(&t),
                Event::Code(t) => text.push_str(&t),
                Event::SoftBreak
                | Event::HardBreak
                | Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..)) => text.push(' '),
                _ => {}
            }
        }

        WHITESPACE.replace_all(&text, " ").trim().to_string()
    }

    /// 生成文章摘要，按字符截断
    pub fn generate_excerpt(&self, markdown: &str, max_length: usize) -> String {
        let text = self.to_text(markdown);

        if text.chars().count() <= max_length {
            return text;
        }

        let truncated: String = text.chars().take(max_length).collect();

        // 在最接近的单词边界处截断；纯中文没有空格，直接按字符截断
        let cut = match truncated.rfind(char::is_whitespace) {
            Some(pos) if pos > truncated.len() / 2 => &truncated[..pos],
            _ => truncated.as_str(),
        };

        format!("{}...", cut.trim_end())
    }

    /// 处理代码块语法高亮
    fn highlight_code_blocks<'a>(&self, parser: Parser<'a, 'a>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut in_code_block = false;
        let mut code_buffer = String::new();
        let mut language = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                    in_code_block = true;
                    language = lang.split_whitespace().next().unwrap_or("").to_string();
                    code_buffer.clear();
                }
                Event::End(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                    in_code_block = false;
                    let highlighted = self.highlight_code(&code_buffer, &language);
                    events.push(Event::Html(highlighted.into()));
                }
                Event::Text(text) if in_code_block => {
                    code_buffer.push_str(&text);
                }
                _ if !in_code_block => events.push(event),
                _ => {}
            }
        }

        events
    }

    /// 把正文中的裸 URL 转换为链接，链接、图片和代码块内的文本保持原样
    fn linkify(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
        let mut output = Vec::with_capacity(events.len());
        let mut pending = String::new();
        let mut link_depth = 0usize;
        let mut in_code_block = false;

        for event in events {
            if link_depth == 0 && !in_code_block {
                if let Event::Text(text) = &event {
                    pending.push_str(text);
                    continue;
                }
            }

            Self::push_linkified(&mut pending, &mut output);

            match &event {
                Event::Start(Tag::Link(..)) | Event::Start(Tag::Image(..)) => link_depth += 1,
                Event::End(Tag::Link(..)) | Event::End(Tag::Image(..)) => {
                    link_depth = link_depth.saturating_sub(1)
                }
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::End(Tag::CodeBlock(_)) => in_code_block = false,
                _ => {}
            }
            output.push(event);
        }

        Self::push_linkified(&mut pending, &mut output);
        output
    }

    fn push_linkified<'a>(pending: &mut String, output: &mut Vec<Event<'a>>) {
        if pending.is_empty() {
            return;
        }
        let text = std::mem::take(pending);

        let mut last = 0;
        for found in BARE_URL.find_iter(&text) {
            // 句末标点不属于链接
            let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            let start = found.start();

            if start > last {
                output.push(Event::Text(text[last..start].to_string().into()));
            }
            output.push(Event::Start(Tag::Link(
                LinkType::Autolink,
                url.to_string().into(),
                "".into(),
            )));
            output.push(Event::Text(url.to_string().into()));
            output.push(Event::End(Tag::Link(
                LinkType::Autolink,
                url.to_string().into(),
                "".into(),
            )));
            last = start + url.len();
        }

        if last < text.len() {
            output.push(Event::Text(text[last..].to_string().into()));
        }
    }

    /// 语法高亮代码
    fn highlight_code(&self, code: &str, language: &str) -> String {
        let syntax = SYNTAX_SET
            .find_syntax_by_token(language)
            .or_else(|| SYNTAX_SET.find_syntax_by_extension(language))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

        let mut html_generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);

        for line in code.split_inclusive('\n') {
            // 单行高亮失败时保留已生成的部分
            if html_generator
                .parse_html_for_line_which_includes_newline(line)
                .is_err()
            {
                break;
            }
        }

        let class = if language.is_empty() {
            "language-plaintext".to_string()
        } else {
            format!("language-{}", language)
        };

        format!(
            r#"<pre class="highlight"><code class="{}">{}</code></pre>"#,
            class,
            html_generator.finalize()
        )
    }

    /// 计算字数：中文字符数 + 英文单词数
    ///
    /// 先去掉围栏代码块、行内代码和 `#*_-[]()` 这些 Markdown 符号。
    /// 中文范围只取 U+4E00–U+9FA5，全角标点不计入。
    pub fn count_words(&self, markdown: &str) -> usize {
        let text = FENCED_CODE.replace_all(markdown, "");
        let text = INLINE_CODE.replace_all(&text, "");
        let text = MARKDOWN_SYNTAX.replace_all(&text, "");
        let text = text.replace('\n', " ");

        CJK_CHAR.find_iter(&text).count() + LATIN_WORD.find_iter(&text).count()
    }

    /// 阅读时间：向上取整的分钟数
    pub fn estimate_reading_time(&self, word_count: usize) -> usize {
        (word_count + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE
    }

    pub fn format_reading_time(&self, word_count: usize) -> String {
        format!("{} 分钟", self.estimate_reading_time(word_count))
    }
}
