/// Typing effect for a panel: the text appears a few space-separated words
/// per tick until the whole of it is shown.
#[derive(Debug, Clone)]
pub struct Reveal {
    text: String,
    /// Byte offset where each word ends.
    ends: Vec<usize>,
    shown: usize,
    per_tick: usize,
}

impl Reveal {
    /// Reveal `text` over roughly `ticks` ticks. Zero ticks shows it at once.
    pub fn new(text: impl Into<String>, ticks: usize) -> Self {
        let text = text.into();
        let mut ends = Vec::new();
        let mut offset = 0;
        for word in text.split(' ') {
            offset += word.len();
            ends.push(offset);
            offset += 1;
        }
        let per_tick = if ticks == 0 {
            ends.len().max(1)
        } else {
            ends.len().div_ceil(ticks).max(1)
        };
        let mut reveal = Self {
            text,
            ends,
            shown: 0,
            per_tick,
        };
        if ticks == 0 {
            reveal.finish();
        }
        reveal
    }

    /// Show the next batch of words. Returns false once everything is visible.
    pub fn tick(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        self.shown = (self.shown + self.per_tick).min(self.ends.len());
        true
    }

    pub fn finish(&mut self) {
        self.shown = self.ends.len();
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.ends.len()
    }

    pub fn visible(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.text[..self.ends[n - 1]],
        }
    }

    pub fn full(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_appear_in_order() {
        let mut r = Reveal::new("a bb ccc", 3);
        assert_eq!(r.visible(), "");
        assert!(r.tick());
        assert_eq!(r.visible(), "a");
        r.tick();
        assert_eq!(r.visible(), "a bb");
        r.tick();
        assert_eq!(r.visible(), "a bb ccc");
        assert!(r.is_done());
        assert!(!r.tick());
    }

    #[test]
    fn finishes_within_tick_budget() {
        let text = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let mut r = Reveal::new(text.clone(), 30);
        let mut ticks = 0;
        while r.tick() {
            ticks += 1;
        }
        assert!(ticks <= 30);
        assert_eq!(r.visible(), text);
    }

    #[test]
    fn newlines_and_double_spaces_survive() {
        let text = "body {\n  margin: 0;\n}\n\n";
        let mut r = Reveal::new(text, 2);
        r.finish();
        assert_eq!(r.visible(), text);
        assert!(text.starts_with(Reveal::new(text, 4).visible()));
    }

    #[test]
    fn zero_ticks_shows_everything() {
        let r = Reveal::new("one two", 0);
        assert!(r.is_done());
        assert_eq!(r.visible(), "one two");
    }

    #[test]
    fn multibyte_words_split_on_boundaries() {
        let mut r = Reveal::new("📄 CSS • ünï", 4);
        r.tick();
        assert_eq!(r.visible(), "📄");
        r.tick();
        assert_eq!(r.visible(), "📄 CSS");
    }
}
