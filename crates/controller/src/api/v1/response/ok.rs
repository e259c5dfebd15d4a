// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! Success response types for REST APIv1
//!
//! These all implement the [`Responder`] trait.
//! Pagination follows the GitHub REST APIv3, i.e. page hints are included inside the Link HTTP header.

use actix_web::body::BoxBody;
use actix_web::http::{header, StatusCode};
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Clone, Serialize)]
pub struct PagePaginationLinks {
    page: i64,
    per_page: i64,
    first: Option<i64>,
    prev: Option<i64>,
    next: Option<i64>,
    last: Option<i64>,
}

impl PagePaginationLinks {
    pub fn new(per_page: i64, page: i64, total: i64) -> Self {
        let first = (page > 1).then_some(1);
        let prev = (page > 1).then_some(page - 1);

        let last_page = {
            let quotient = total / per_page;
            let remainder = total % per_page;
            if remainder > 0 && per_page > 0 {
                quotient + 1
            } else {
                quotient
            }
        };

        let next = (page < last_page).then_some(page + 1);
        let last = (page < last_page).then_some(last_page);

        Self {
            page,
            per_page,
            first,
            prev,
            next,
            last,
        }
    }

    fn as_links_vec(&self, url: &Url) -> Vec<(&'static str, String)> {
        let mut query = url
            .query_pairs()
            .into_owned()
            .collect::<HashMap<String, String>>();
        query.remove("page");
        let mut url = url.clone();
        let base = url
            .query_pairs_mut()
            .clear()
            .extend_pairs(query.iter())
            .finish();

        let pages = [
            ("first", self.first),
            ("prev", self.prev),
            ("next", self.next),
            ("last", self.last),
        ];

        pages
            .into_iter()
            .filter_map(|(rel, page)| {
                let page = page?;
                let link = base
                    .clone()
                    .query_pairs_mut()
                    .append_pair("page", &page.to_string())
                    .finish()
                    .to_string();

                Some((rel, link))
            })
            .collect()
    }
}

/// A 200 OK response with a JSON body and optional pagination headers
pub struct ApiResponse<T> {
    data: T,
    status: StatusCode,
    page_pagination: Option<PagePaginationLinks>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
            page_pagination: None,
        }
    }

    /// Override the default 200 OK status
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Attach GitHub-style `Link` page-pagination headers to the response
    pub fn with_page_pagination(mut self, per_page: i64, page: i64, total: i64) -> Self {
        self.page_pagination = Some(PagePaginationLinks::new(per_page, page, total));
        self
    }

    /// Access the contained data, e.g. for inspection in tests
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: Serialize> Responder for ApiResponse<T> {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);

        if let Some(pagination) = &self.page_pagination {
            let conn = req.connection_info();
            let url = format!("{}://{}{}", conn.scheme(), conn.host(), req.uri());

            if let Ok(url) = Url::parse(&url) {
                let links = pagination
                    .as_links_vec(&url)
                    .into_iter()
                    .map(|(rel, link)| format!("<{link}>; rel=\"{rel}\""))
                    .collect::<Vec<_>>()
                    .join(", ");

                if !links.is_empty() {
                    builder.insert_header((header::LINK, links));
                }
            }
        }

        builder.json(&self.data)
    }
}
