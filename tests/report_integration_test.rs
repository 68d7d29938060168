// ==========================================
// 报表端到端集成测试
// ==========================================
// 测试目标: SQLite 落库 → 事实查询 → 引擎计算 → ReportApi 输出
// ==========================================


use repair_reports::config::{config_keys, ConfigManager};
use repair_reports::domain::NewRepair;
use repair_reports::logging;
use repair_reports::{ApiError, ReportApi};
use rust_decimal::Decimal;
use test_helpers::{create_test_db, date, money, shared_connection, Seeder};

#[test]
fn test_unprofitability_rating_end_to_end() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let seed = Seeder::new(conn.clone());

    let maker = seed.manufacturer("Samsung");
    let p1 = seed.product(maker, "Galaxy A52", "смартфоны", "100.00");
    let p2 = seed.product(maker, "QLED Q80", "телевизоры", "400.00");
    // 无维修记录的产品不进入排名
    seed.product(maker, "Galaxy Tab", "планшеты", "50.00");
    let city = seed.city("Новосибирск");
    let shop = seed.shop(city, "ул. Ленина, 1");

    seed.completed_repair(p1, shop, "100.00", "100.00");
    seed.completed_repair(p1, shop, "200.00", "200.00");
    seed.completed_repair(p1, shop, "300.00", "300.00");
    seed.completed_repair(p2, shop, "400.00", "400.00");
    seed.completed_repair(p2, shop, "400.00", "0.00");
    seed.completed_repair(p2, shop, "400.00", "400.00");

    let api = ReportApi::from_connection(conn).unwrap();
    let rows = api.unprofitability_rating(None).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].model_name, "QLED Q80");
    assert_eq!(rows[0].manufacturer, "Samsung");
    assert_eq!(rows[0].problem_rank, 1);
    assert_eq!(rows[0].repair_count, 3);
    assert_eq!(rows[0].total_repair_cost, money("1200"));
    assert_eq!(rows[0].avg_repair_cost, money("400.00"));
    assert_eq!(rows[0].warranty_costs, money("400"));

    assert_eq!(rows[1].model_name, "Galaxy A52");
    assert_eq!(rows[1].problem_rank, 2);
    assert_eq!(rows[1].total_repair_cost, money("600"));
    assert_eq!(rows[1].avg_repair_cost, money("200.00"));
    assert_eq!(rows[1].warranty_costs, Decimal::ZERO);
}

#[test]
fn test_ranking_ties_and_limit_end_to_end() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let seed = Seeder::new(conn.clone());

    let maker = seed.manufacturer("LG");
    let city = seed.city("Омск");
    let shop = seed.shop(city, "пр. Мира, 5");
    for i in 0..4 {
        let product = seed.product(maker, &format!("Model {}", i), "стиральные машины", "10.00");
        let cost = if i == 3 { "10.00" } else { "50.00" };
        seed.completed_repair(product, shop, cost, cost);
    }

    let api = ReportApi::from_connection(conn).unwrap();
    let ranks: Vec<u64> = api
        .unprofitability_rating(None)
        .unwrap()
        .iter()
        .map(|r| r.problem_rank)
        .collect();
    assert_eq!(ranks, vec![1, 1, 1, 4]);

    let limited = api.unprofitability_rating(Some(2)).unwrap();
    assert_eq!(limited.len(), 2);
    assert!(limited.iter().all(|r| r.problem_rank == 1));
}

#[test]
fn test_city_coverage_end_to_end() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let seed = Seeder::new(conn.clone());

    let maker = seed.manufacturer("Xiaomi");
    let phone = seed.product(maker, "Redmi Note 10", "смартфоны", "80.00");
    let vacuum = seed.product(maker, "Mi Robot", "пылесосы", "60.00");

    let tomsk = seed.city("Томск");
    let shop1 = seed.shop(tomsk, "ул. Кирова, 10");
    let shop2 = seed.shop(tomsk, "ул. Гагарина, 3");
    seed.specialize(shop1, phone);
    seed.completed_repair(phone, shop1, "80.00", "80.00");
    seed.completed_repair(phone, shop1, "90.00", "0.00");
    // 维修点 2 修过手机但无专长，不计入 repairs_done
    seed.completed_repair(phone, shop2, "70.00", "70.00");

    seed.city("Абакан");

    let omsk = seed.city("Омск");
    let shop3 = seed.shop(omsk, "ул. Ленина, 2");
    seed.specialize(shop3, phone);
    seed.specialize(shop3, vacuum);

    let api = ReportApi::from_connection(conn).unwrap();
    let rows = api.city_coverage().unwrap();

    let keys: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.city_name.as_str(), r.category.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Абакан", "Все категории"),
            ("Омск", "пылесосы"),
            ("Омск", "смартфоны"),
            ("Томск", "смартфоны"),
        ]
    );

    let abakan = &rows[0];
    assert!(abakan.all_categories);
    assert_eq!(abakan.total_shops, 0);
    assert_eq!(abakan.specialized_shops, 0);
    assert_eq!(abakan.repairs_done, 0);
    assert_eq!(abakan.coverage_percentage, Decimal::ZERO);

    let omsk_vacuum = &rows[1];
    assert_eq!(omsk_vacuum.total_shops, 1);
    assert_eq!(omsk_vacuum.coverage_percentage.to_string(), "100.0");

    let tomsk_phones = &rows[3];
    assert_eq!(tomsk_phones.total_shops, 2);
    assert_eq!(tomsk_phones.specialized_shops, 1);
    assert_eq!(tomsk_phones.repairs_done, 2);
    assert_eq!(tomsk_phones.coverage_percentage.to_string(), "50.0");
}

#[test]
fn test_config_overrides_apply_to_reports() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let seed = Seeder::new(conn.clone());

    let maker = seed.manufacturer("Bosch");
    let city = seed.city("Курган");
    let shop = seed.shop(city, "ул. Советская, 7");
    for i in 0..5 {
        let product = seed.product(maker, &format!("Serie {}", i), "холодильники", "10.00");
        seed.completed_repair(product, shop, "10.00", "10.00");
    }
    seed.city("Бийск");

    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_value(config_keys::DEFAULT_RATING_LIMIT, "3")
        .unwrap();
    config
        .set_global_value(config_keys::ALL_CATEGORIES_LABEL, "All categories")
        .unwrap();

    let api = ReportApi::from_connection(conn).unwrap();
    assert_eq!(api.config().default_rating_limit, 3);
    assert_eq!(api.unprofitability_rating(None).unwrap().len(), 3);

    let coverage = api.city_coverage().unwrap();
    let biysk = coverage
        .iter()
        .find(|r| r.city_name == "Бийск")
        .expect("sentinel row for Бийск");
    assert_eq!(biysk.category, "All categories");
}

#[test]
fn test_malformed_config_is_reported() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);

    ConfigManager::new(&db_path)
        .unwrap()
        .set_global_value(config_keys::DEFAULT_RATING_LIMIT, "-1")
        .unwrap();

    let result = ReportApi::from_connection(conn);
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn test_category_statistics_and_summary_end_to_end() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let seed = Seeder::new(conn.clone());

    let maker = seed.manufacturer("Philips");
    let tv = seed.product(maker, "OLED 806", "телевизоры", "300.00");
    seed.product(maker, "Azur 8000", "утюги", "20.00");
    let city = seed.city("Чита");
    let shop = seed.shop(city, "ул. Амурская, 1");

    seed.completed_repair(tv, shop, "300.00", "300.00");

    // 保修单开单 → 完工：客户费用保持 0
    let warranty = seed
        .repairs
        .create_repair(
            &NewRepair {
                product_id: tv,
                shop_id: shop,
                serial_number: Some("SN-001".to_string()),
                defect_description: Some("нет изображения".to_string()),
                is_warranty: true,
            },
            date(2024, 5, 1),
        )
        .unwrap();
    let completed = seed
        .repairs
        .complete_repair(warranty.repair_id, money("150.50"), date(2024, 5, 3))
        .unwrap();
    assert_eq!(completed.client_cost, Decimal::ZERO);
    assert_eq!(completed.actual_repair_cost, money("150.50"));

    // 付费单仍在维修中
    let open = seed
        .repairs
        .create_repair(
            &NewRepair {
                product_id: tv,
                shop_id: shop,
                serial_number: None,
                defect_description: None,
                is_warranty: false,
            },
            date(2024, 6, 1),
        )
        .unwrap();
    assert!(open.is_open());

    let api = ReportApi::from_connection(conn).unwrap();

    let stats = api.category_statistics().unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].category, "телевизоры");
    assert_eq!(stats[0].product_count, 1);
    assert_eq!(stats[0].repair_count, 3);
    assert_eq!(stats[0].total_repair_cost, money("750.50"));
    assert_eq!(stats[0].avg_repair_cost, money("250.17"));
    assert_eq!(stats[1].category, "утюги");
    assert_eq!(stats[1].repair_count, 0);
    assert_eq!(stats[1].avg_repair_cost, Decimal::ZERO);

    let summary = api.repair_summary().unwrap();
    assert_eq!(summary.active_repairs, 1);
    assert_eq!(summary.completed_repairs, 2);
    assert_eq!(summary.warranty_repairs, 1);
    assert_eq!(summary.total_repair_cost, money("750.50"));
    assert_eq!(summary.products_count, 2);
    assert_eq!(summary.shops_count, 1);

    let active = seed.repairs.list_active().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].repair_id, open.repair_id);
}

#[test]
fn test_empty_store_reports() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let api = ReportApi::from_connection(shared_connection(&db_path)).unwrap();

    assert!(api.unprofitability_rating(None).unwrap().is_empty());
    assert!(api.city_coverage().unwrap().is_empty());
    assert!(api.category_statistics().unwrap().is_empty());

    let summary = api.repair_summary().unwrap();
    assert_eq!(summary.active_repairs, 0);
    assert_eq!(summary.total_repair_cost, Decimal::ZERO);
}

#[test]
fn test_sub_cent_costs_are_reported_exactly() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let seed = Seeder::new(conn.clone());

    let maker = seed.manufacturer("Haier");
    let product = seed.product(maker, "HB18", "холодильники", "100.00");
    let city = seed.city("Барнаул");
    let shop = seed.shop(city, "пр. Ленина, 12");
    seed.completed_repair(product, shop, "100.004", "0.004");

    let api = ReportApi::from_connection(conn).unwrap();

    let rows = api.unprofitability_rating(None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_repair_cost.to_string(), "100.004");
    assert_eq!(rows[0].warranty_costs, Decimal::ZERO);
    assert_eq!(rows[0].avg_repair_cost.to_string(), "100.00");

    let summary = api.repair_summary().unwrap();
    assert_eq!(summary.warranty_repairs, 0);
    assert_eq!(summary.total_repair_cost.to_string(), "100.004");
}
