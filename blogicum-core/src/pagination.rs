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

use serde::Serialize;

/// Posts per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page arithmetic for LIMIT/OFFSET listings. The requested page number is
/// clamped into `1..=total_pages`, so an out-of-range `?page=` lands on the
/// last page instead of an empty one.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator {
    page: u32,
    per_page: u32,
    total_items: i64,
}

/// Template-facing view of a paginator
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageContext {
    pub number: u32,
    pub total_pages: u32,
    pub total_items: i64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous: u32,
    pub next: u32,
}

impl Paginator {
    pub fn new(requested_page: u32, per_page: u32, total_items: i64) -> Self {
        let per_page = per_page.max(1);
        let mut paginator = Self {
            page: 1,
            per_page,
            total_items: total_items.max(0),
        };
        paginator.page = requested_page.clamp(1, paginator.total_pages());
        paginator
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        let pages = (self.total_items + i64::from(self.per_page) - 1) / i64::from(self.per_page);
        (pages.max(1)) as u32
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn context(&self) -> PageContext {
        PageContext {
            number: self.page,
            total_pages: self.total_pages(),
            total_items: self.total_items,
            has_previous: self.has_previous(),
            has_next: self.has_next(),
            previous: self.page.saturating_sub(1).max(1),
            next: (self.page + 1).min(self.total_pages()),
        }
    }
}
