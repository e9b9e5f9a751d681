//! End-to-end template resolution: markup, conditions and cleanup
//! working together on realistic queries.

mod common;
use common::*;

use serde_json::json;

// === Optional filters ===

#[test]
fn time_range_with_one_bound_set() {
    let fragment = "SELECT * FROM jobs\
                    <where>\
                    <if test=\"start_time\">created_at &gt;= :start_time</if>\
                    <if test=\"end_time\"> AND created_at &lt;= :end_time</if>\
                    </where>";
    let p = params(json!({ "start_time": "2024-01-01", "end_time": null }));
    assert_eq!(
        resolve(fragment, &p),
        "SELECT * FROM jobs WHERE created_at >= :start_time"
    );
}

#[test]
fn time_range_with_both_bounds_set() {
    let fragment = "SELECT * FROM jobs\
                    <where>\
                    <if test=\"start_time\">created_at &gt;= :start_time</if>\
                    <if test=\"end_time\"> AND created_at &lt;= :end_time</if>\
                    </where>";
    let p = params(json!({ "start_time": "2024-01-01", "end_time": "2024-02-01" }));
    assert_eq!(
        resolve(fragment, &p),
        "SELECT * FROM jobs WHERE created_at >= :start_time AND created_at <= :end_time"
    );
}

#[test]
fn where_vanishes_when_no_filter_applies() {
    let fragment = "SELECT * FROM jobs\
                    <where>\
                    <if test=\"start_time\">created_at &gt;= :start_time</if>\
                    </where> ORDER BY id";
    assert_eq!(
        resolve(fragment, &params(json!({}))),
        "SELECT * FROM jobs ORDER BY id"
    );
}

#[test]
fn leading_connector_stripped_when_first_filter_drops() {
    let fragment = "SELECT * FROM users\
                    <where>\
                    <if test=\"name\">name = :name</if>\
                    <if test=\"status\"> AND status = :status</if>\
                    </where>";
    assert_eq!(
        resolve(fragment, &params(json!({ "status": 2 }))),
        "SELECT * FROM users WHERE status = :status"
    );
}

// === Branch selection ===

#[test]
fn choose_picks_otherwise_for_inactive_status() {
    let fragment = "<choose>\
                    <when test=\"status == 1\">active=true</when>\
                    <otherwise>active=false</otherwise>\
                    </choose>";
    assert_eq!(resolve(fragment, &params(json!({ "status": 0 }))), "active=false");
    assert_eq!(resolve(fragment, &params(json!({ "status": 1 }))), "active=true");
}

#[test]
fn choose_takes_first_matching_branch_only() {
    let fragment = "SELECT * FROM files ORDER BY \
                    <choose>\
                    <when test=\"sort == 'name'\">name ASC</when>\
                    <when test=\"sort\">:sort</when>\
                    <otherwise>id DESC</otherwise>\
                    </choose>";
    assert_eq!(
        resolve(fragment, &params(json!({ "sort": "name" }))),
        "SELECT * FROM files ORDER BY name ASC"
    );
    assert_eq!(
        resolve(fragment, &params(json!({ "sort": "size" }))),
        "SELECT * FROM files ORDER BY :sort"
    );
    assert_eq!(
        resolve(fragment, &params(json!({}))),
        "SELECT * FROM files ORDER BY id DESC"
    );
}

// === Text handling ===

#[test]
fn tail_after_conditional_block_always_emits() {
    let fragment = "SELECT * FROM t<if test=\"x\"> WHERE a=:a</if> LIMIT 10";
    assert_eq!(resolve(fragment, &params(json!({}))), "SELECT * FROM t LIMIT 10");
    assert_eq!(
        resolve(fragment, &params(json!({ "x": 1 }))),
        "SELECT * FROM t WHERE a=:a LIMIT 10"
    );
}

#[test]
fn entities_decode_only_in_final_output() {
    let fragment = "SELECT * FROM t WHERE a &lt;&gt; :a AND b &amp; 4 = 0";
    assert_eq!(
        resolve(fragment, &params(json!({}))),
        "SELECT * FROM t WHERE a <> :a AND b & 4 = 0"
    );
}

#[test]
fn quoted_literals_survive_cleanup() {
    let fragment = "SELECT * FROM t WHERE note = 'rock  and  roll'<if test=\"x\">  AND  b=1</if>";
    assert_eq!(
        resolve(fragment, &params(json!({ "x": 1 }))),
        "SELECT * FROM t WHERE note = 'rock  and  roll' AND b=1"
    );
}

#[test]
fn multiline_template_keeps_newlines() {
    let fragment = "SELECT *\nFROM t\n<if test=\"x\">WHERE a=1</if>";
    assert_eq!(
        resolve(fragment, &params(json!({ "x": 1 }))),
        "SELECT *\nFROM t\nWHERE a=1"
    );
}

// === Condition behavior at the template level ===

#[test]
fn failed_condition_drops_block_but_not_query() {
    let fragment = "SELECT 1<if test=\"os.system('rm')\"> WHERE 1=0</if>";
    assert_eq!(resolve(fragment, &params(json!({}))), "SELECT 1");
}

#[test]
fn missing_test_attribute_is_false() {
    let fragment = "SELECT 1<if> WHERE 1=0</if>";
    assert_eq!(resolve(fragment, &params(json!({}))), "SELECT 1");
}

#[test]
fn zero_valued_parameter_still_counts_as_present() {
    let fragment = "SELECT * FROM t<where><if test=\"status\">status = :status</if></where>";
    assert_eq!(
        resolve(fragment, &params(json!({ "status": 0 }))),
        "SELECT * FROM t WHERE status = :status"
    );
}

#[test]
fn condition_on_string_parameter_value() {
    let fragment = "<choose>\
                    <when test=\"role == 'admin'\">SELECT * FROM audit</when>\
                    <otherwise>SELECT * FROM audit WHERE user = :user</otherwise>\
                    </choose>";
    assert_eq!(
        resolve(fragment, &params(json!({ "role": "admin" }))),
        "SELECT * FROM audit"
    );
    assert_eq!(
        resolve(fragment, &params(json!({ "role": "viewer", "user": "u1" }))),
        "SELECT * FROM audit WHERE user = :user"
    );
}

// === Structure ===

#[test]
fn nested_if_inside_choose_inside_where() {
    let fragment = "SELECT * FROM t\
                    <where>\
                    <choose>\
                    <when test=\"a\">AND a = :a<if test=\"b\"> AND b = :b</if></when>\
                    <otherwise>AND deleted = 0</otherwise>\
                    </choose>\
                    </where>";
    assert_eq!(
        resolve(fragment, &params(json!({ "a": 1, "b": 2 }))),
        "SELECT * FROM t WHERE a = :a AND b = :b"
    );
    assert_eq!(
        resolve(fragment, &params(json!({ "a": 1 }))),
        "SELECT * FROM t WHERE a = :a"
    );
    assert_eq!(
        resolve(fragment, &params(json!({}))),
        "SELECT * FROM t WHERE deleted = 0"
    );
}

#[test]
fn unknown_wrapper_tags_are_transparent() {
    let fragment = "<sql>SELECT 1<if test=\"x\"> + 1</if></sql>";
    assert_eq!(resolve(fragment, &params(json!({ "x": 1 }))), "SELECT 1 + 1");
}

#[test]
fn repeated_resolution_is_deterministic() {
    let t = template(
        "SELECT * FROM t<where><if test=\"a\">a=:a</if><if test=\"b\"> AND b=:b</if></where>",
    );
    let p = params(json!({ "a": 1, "b": 2 }));
    let first = t.resolve(&p);
    for _ in 0..10 {
        assert_eq!(t.resolve(&p), first);
    }
    assert_eq!(first, "SELECT * FROM t WHERE a=:a AND b=:b");
}

#[test]
fn malformed_markup_is_rejected_up_front() {
    assert!(dynsql_core::Template::parse("<if test=\"x\">a").is_err());
    assert!(dynsql_core::Template::parse("<where><if>a</where></if>").is_err());
}
