//! Handlers for Visible Person Commitment (VPC) reports.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::pagination::{PageQuery, MAX_PAGE_SIZE};
use safewatch_core::roles::Role;
use safewatch_core::search::SelectOption;
use safewatch_core::vpc::{tally, NewVpc, Vpc, VpcFilter, VpcTally, VpcType, VPC_DATA_FIELD};
use serde::Serialize;
use validator::Validate;

use super::paging;
use crate::error::AppResult;
use crate::forms::read_upload;
use crate::middleware::gate::{AdminOnly, Gate, VpcRegister};
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{enum_options, ListPage, UploadRules, VpcRow};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcListPage {
    pub filter: VpcFilter,
    pub types: Vec<SelectOption>,
    /// Safe/unsafe counts for the rows on this page.
    pub tally: VpcTally,
    #[serde(flatten)]
    pub list: ListPage<VpcRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcFormPage {
    pub types: Vec<SelectOption>,
    pub departments: Vec<SelectOption>,
    pub uploads: UploadRules,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcDetailPage {
    pub vpc: Vpc,
    pub summary: VpcRow,
    pub can_delete: bool,
}

/// GET /vpcs
pub async fn list_vpcs(
    State(state): State<AppState>,
    Gate(user, _): Gate<VpcRegister>,
    Query(mut filter): Query<VpcFilter>,
) -> AppResult<Json<DataResponse<VpcListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).list_vpcs(&filter).await?;
    Ok(list_page(filter, page))
}

/// GET /vpcs/my
pub async fn my_vpcs(
    State(state): State<AppState>,
    user: SessionUser,
    Query(mut filter): Query<VpcFilter>,
) -> AppResult<Json<DataResponse<VpcListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).my_vpcs(&filter).await?;
    Ok(list_page(filter, page))
}

fn list_page(filter: VpcFilter, page: safewatch_client::Paged<Vpc>) -> Json<DataResponse<VpcListPage>> {
    Json(DataResponse {
        data: VpcListPage {
            tally: tally(&page.items),
            filter,
            types: enum_options(&VpcType::ALL),
            list: ListPage::from_paged(page, VpcRow::from),
        },
    })
}

/// GET /vpcs/new
///
/// Form options, including the department dropdown.
pub async fn new_vpc_form(
    State(state): State<AppState>,
    user: SessionUser,
) -> AppResult<Json<DataResponse<VpcFormPage>>> {
    let query = PageQuery {
        page: Some(1),
        limit: Some(MAX_PAGE_SIZE),
    };
    let departments = user.api(&state).list_departments(&query).await?;

    Ok(Json(DataResponse {
        data: VpcFormPage {
            types: enum_options(&VpcType::ALL),
            departments: departments
                .items
                .iter()
                .filter(|d| d.is_active)
                .map(|d| d.to_option())
                .collect(),
            uploads: UploadRules::current(),
        },
    }))
}

/// GET /vpcs/{id}
pub async fn vpc_detail(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<VpcDetailPage>>> {
    let vpc = user.api(&state).get_vpc(&id).await?;
    Ok(Json(DataResponse {
        data: VpcDetailPage {
            summary: VpcRow::from(vpc.clone()),
            vpc,
            can_delete: user.role == Role::Admin,
        },
    }))
}

/// POST /vpcs
///
/// Multipart: `vpcData` JSON plus optional `attachments`.
pub async fn create_vpc(
    State(state): State<AppState>,
    user: SessionUser,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let (form, files): (NewVpc, _) = read_upload(multipart, VPC_DATA_FIELD).await?;
    form.validate()?;

    let vpc = user.api(&state).create_vpc(&form, files).await?;
    tracing::info!(
        user_id = %user.user_id,
        vpc_id = %vpc.id,
        report = %vpc.report_number,
        kind = ?vpc.vpc_type,
        "VPC recorded"
    );
    Ok(Redirect::to("/vpcs"))
}

/// POST /vpcs/{id}/delete
pub async fn delete_vpc(
    State(state): State<AppState>,
    Gate(user, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    user.api(&state).delete_vpc(&id).await?;
    tracing::info!(user_id = %user.user_id, vpc_id = %id, "VPC deleted");
    Ok(Redirect::to("/vpcs"))
}
